//! Trusted binary location for the external probe and encoder tools.
//!
//! The [`BinaryLocator`] produces a validated absolute path for a tool kind,
//! either from an explicit user-configured path or by walking a fixed,
//! platform-specific list of well-known install locations. It never consults
//! the process's inherited `PATH`: explicit candidate arrays keep resolution
//! deterministic and avoid picking up an attacker-controlled or wrong-version
//! binary placed earlier in a user's search path.
//!
//! Candidates are only trusted after validation: the executable is spawned
//! with a version query under a short deadline, and must exit zero with the
//! expected tool name in its output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use clipfit_core::{Error, Result, ToolKind};

use crate::command::{ExecError, ToolCommand};

/// Deadline for the version-query validation run.
const VALIDATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// A tool path that has passed validation.
///
/// Created once per [`ToolKind`] on first successful resolution and cached
/// for the process lifetime; never handed out before validation succeeds.
#[derive(Debug, Clone)]
pub struct ResolvedBinary {
    /// Which tool this path was validated as.
    pub kind: ToolKind,
    /// Absolute path of the executable.
    pub path: PathBuf,
    /// When validation succeeded.
    pub validated_at: Instant,
}

/// Platform identifier for candidate-list selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and other Unix-like systems.
    Unix,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// Ordered list of well-known install locations for a tool on a platform.
///
/// Pure and data-driven so the per-platform lists are unit-testable
/// regardless of the host the tests run on.
pub fn candidate_paths(platform: Platform, kind: ToolKind) -> Vec<PathBuf> {
    let name = kind.tool_name();
    match platform {
        Platform::Windows => {
            let dirs = [
                r"C:\ffmpeg\bin",
                r"C:\Program Files\ffmpeg\bin",
                r"C:\Program Files (x86)\ffmpeg\bin",
                r"C:\ProgramData\chocolatey\bin",
            ];
            dirs.iter()
                .map(|d| PathBuf::from(format!(r"{d}\{name}.exe")))
                .collect()
        }
        Platform::MacOs => {
            let dirs = [
                "/opt/homebrew/bin", // Homebrew on Apple Silicon
                "/usr/local/bin",    // Homebrew on Intel
                "/opt/local/bin",    // MacPorts
                "/usr/bin",
            ];
            dirs.iter().map(|d| PathBuf::from(format!("{d}/{name}"))).collect()
        }
        Platform::Unix => {
            let dirs = ["/usr/bin", "/usr/local/bin", "/snap/bin"];
            dirs.iter().map(|d| PathBuf::from(format!("{d}/{name}"))).collect()
        }
    }
}

/// Discovers, validates, and caches the executable paths of the external
/// tools.
///
/// Constructed once at process start and shared by handle; the memoized
/// cache is the only state shared across concurrent compression requests.
/// Racing resolutions for the same unresolved kind may validate redundantly,
/// but all converge on the first cached path.
#[derive(Debug)]
pub struct BinaryLocator {
    cache: RwLock<HashMap<ToolKind, ResolvedBinary>>,
    validation_timeout: Duration,
}

impl Default for BinaryLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryLocator {
    /// Create a locator with an empty resolution cache.
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            validation_timeout: VALIDATION_TIMEOUT,
        }
    }

    /// Override the validation deadline (tests exercise the timeout path
    /// without waiting out the production default).
    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    /// Produce a validated path for `kind`.
    ///
    /// A cached path is returned immediately without re-validation. An
    /// explicit `user_path` must be absolute and existing, and is validated
    /// with no fallback to auto-discovery on failure. Without a user path,
    /// the platform candidate list is walked and the first candidate that
    /// exists and validates wins.
    pub async fn resolve(&self, user_path: Option<&Path>, kind: ToolKind) -> Result<PathBuf> {
        if let Some(found) = self.cached_path(kind) {
            return Ok(found);
        }

        if let Some(path) = user_path {
            if !path.is_absolute() {
                return Err(Error::invalid_config(kind.tool_name(), path));
            }
            if !path.exists() {
                return Err(Error::not_found(kind.tool_name(), path));
            }
            self.validate(path, kind).await?;
            tracing::info!(tool = %kind, path = %path.display(), "using configured tool path");
            return Ok(self.cache_validated(kind, path));
        }

        for candidate in candidate_paths(Platform::current(), kind) {
            if !candidate.exists() {
                continue;
            }
            match self.validate(&candidate, kind).await {
                Ok(()) => {
                    tracing::info!(tool = %kind, path = %candidate.display(), "discovered tool");
                    return Ok(self.cache_validated(kind, &candidate));
                }
                Err(e) => {
                    tracing::debug!(
                        tool = %kind,
                        path = %candidate.display(),
                        error = %e,
                        "candidate rejected"
                    );
                }
            }
        }

        Err(Error::not_resolved(kind.tool_name()))
    }

    /// Confirm that the executable at `path` is genuinely the expected tool.
    ///
    /// Spawns `<path> -version` under the validation deadline and requires a
    /// zero exit code plus the tool's name (case-insensitive) in the
    /// collected output. The deadline, a normal exit, and a spawn error are
    /// mutually exclusive outcomes; on timeout the child is killed and no
    /// exit-derived error can follow for the same run.
    pub async fn validate(&self, path: &Path, kind: ToolKind) -> Result<()> {
        let name = kind.tool_name();

        let output = ToolCommand::new(path)
            .arg(kind.version_arg())
            .timeout(self.validation_timeout)
            .execute()
            .await
            .map_err(|e| match e {
                ExecError::TimedOut { .. } => Error::ValidationTimeout {
                    tool: name.to_string(),
                    timeout_ms: self.validation_timeout.as_millis() as u64,
                },
                ExecError::Spawn { source, .. } => Error::spawn_failed(name, source.to_string()),
                ExecError::Wait { source, .. } => Error::spawn_failed(name, source.to_string()),
            })?;

        if !output.success() {
            return Err(Error::invalid_binary(
                name,
                path,
                format!("version query exited with {}", output.status),
            ));
        }
        if !output.stdout.to_lowercase().contains(name) {
            return Err(Error::invalid_binary(
                name,
                path,
                format!("version output does not mention {name}"),
            ));
        }

        Ok(())
    }

    /// The cached path for `kind`, or [`Error::NotResolved`] if resolution
    /// has not yet succeeded in this process lifetime.
    pub fn current_path(&self, kind: ToolKind) -> Result<PathBuf> {
        self.cached_path(kind)
            .ok_or_else(|| Error::not_resolved(kind.tool_name()))
    }

    fn cached_path(&self, kind: ToolKind) -> Option<PathBuf> {
        self.cache.read().get(&kind).map(|r| r.path.clone())
    }

    /// Insert a freshly validated path, keeping an earlier winner if a
    /// concurrent resolution got there first, and return the cached path.
    fn cache_validated(&self, kind: ToolKind, path: &Path) -> PathBuf {
        let mut cache = self.cache.write();
        cache
            .entry(kind)
            .or_insert_with(|| ResolvedBinary {
                kind,
                path: path.to_path_buf(),
                validated_at: Instant::now(),
            })
            .path
            .clone()
    }
}
