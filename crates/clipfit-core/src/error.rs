//! Unified error type for the clipfit compression core.
//!
//! All crates funnel their failures into [`Error`]. Every failure is local to
//! one resolution or compression request and is returned as a value; nothing
//! in the core aborts the host process.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving tools or compressing media.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied tool path is not absolute.
    #[error("configured {tool} path must be absolute: {}", path.display())]
    InvalidConfig {
        /// Name of the tool the path was configured for.
        tool: String,
        /// The offending path.
        path: PathBuf,
    },

    /// A user-supplied tool path does not exist on the filesystem.
    #[error("configured {tool} path does not exist: {}", path.display())]
    NotFound { tool: String, path: PathBuf },

    /// An executable was found but failed the version-query validation check.
    #[error("{tool} candidate at {} failed validation: {message}", path.display())]
    InvalidBinary {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// The validation query did not complete within its deadline.
    #[error("{tool} validation timed out after {timeout_ms} ms")]
    ValidationTimeout { tool: String, timeout_ms: u64 },

    /// The operating system could not start the child process at all.
    #[error("failed to spawn {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    /// No candidate path succeeded auto-discovery, or a path was requested
    /// before any resolution occurred.
    #[error("{tool} could not be located; install it or configure an explicit path")]
    NotResolved { tool: String },

    /// Duration measurement failed (bad exit code or unusable output).
    #[error("duration probe failed: {0}")]
    ProbeFailed(String),

    /// The computed video bitrate fell below the floor; encoding is refused.
    #[error("computed video bitrate {kbps} kbps is below the {floor} kbps minimum; \
             the target size is too small for this clip")]
    BitrateTooLow { kbps: u64, floor: u64 },

    /// The encoder exited with a non-zero status.
    #[error("encoder failed: {0}")]
    EncodeFailed(String),

    /// The encoder exceeded the caller's deadline and was killed.
    #[error("encoder did not finish within {timeout_ms} ms and was terminated")]
    Timeout { timeout_ms: u64 },

    /// Host-supplied data failed validation (config parse errors).
    #[error("validation error: {0}")]
    Validation(String),

    /// An I/O operation failed (temp file handling).
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Stable machine-readable label for this error kind, for host-side
    /// reporting and log correlation.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfig { .. } => "invalid_config",
            Error::NotFound { .. } => "not_found",
            Error::InvalidBinary { .. } => "invalid_binary",
            Error::ValidationTimeout { .. } => "validation_timeout",
            Error::SpawnFailed { .. } => "spawn_failed",
            Error::NotResolved { .. } => "not_resolved",
            Error::ProbeFailed(_) => "probe_failed",
            Error::BitrateTooLow { .. } => "bitrate_too_low",
            Error::EncodeFailed(_) => "encode_failed",
            Error::Timeout { .. } => "timeout",
            Error::Validation(_) => "validation",
            Error::Io { .. } => "io",
        }
    }

    /// Convenience constructor for [`Error::InvalidConfig`].
    pub fn invalid_config(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::InvalidConfig {
            tool: tool.into(),
            path: path.into(),
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::NotFound {
            tool: tool.into(),
            path: path.into(),
        }
    }

    /// Convenience constructor for [`Error::InvalidBinary`].
    pub fn invalid_binary(
        tool: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidBinary {
            tool: tool.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::SpawnFailed`].
    pub fn spawn_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SpawnFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::NotResolved`].
    pub fn not_resolved(tool: impl Into<String>) -> Self {
        Error::NotResolved { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::ProbeFailed`].
    pub fn probe_failed(message: impl Into<String>) -> Self {
        Error::ProbeFailed(message.into())
    }

    /// Convenience constructor for [`Error::EncodeFailed`].
    pub fn encode_failed(message: impl Into<String>) -> Self {
        Error::EncodeFailed(message.into())
    }
}
