//! Host-facing configuration types.
//!
//! The top-level [`Config`] is deserialized from JSON supplied by the host's
//! settings store. Every section defaults sensibly so an empty `{}` document
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{EncoderPreset, MaxResolution};

/// Root configuration for the compression core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolPathsConfig,
    pub compression: CompressionConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// Intentionally string-based so the host can read its settings store
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.compression.target_size_mb == 0 {
            warnings.push("compression.target_size_mb is 0; every clip will be refused".into());
        }
        if self.compression.timeout_secs == 0 {
            warnings.push("compression.timeout_secs is 0; every encode will time out".into());
        }
        if self.compression.threshold_mb < self.compression.target_size_mb {
            warnings.push(format!(
                "compression.threshold_mb ({}) is below target_size_mb ({}); \
                 compressed output may still exceed the threshold",
                self.compression.threshold_mb, self.compression.target_size_mb
            ));
        }
        if let Some(ref p) = self.tools.probe_path {
            if !p.is_absolute() {
                warnings.push(format!("tools.probe_path is not absolute: {}", p.display()));
            }
        }
        if let Some(ref p) = self.tools.encoder_path {
            if !p.is_absolute() {
                warnings.push(format!("tools.encoder_path is not absolute: {}", p.display()));
            }
        }

        warnings
    }
}

/// Optional explicit filesystem paths for the external tools.
///
/// When a path is set it is used verbatim (and must be absolute); when unset
/// the locator falls back to platform-specific well-known install locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoder_path: Option<PathBuf>,
}

/// User-configured compression behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Desired maximum output size in megabytes.
    pub target_size_mb: u64,
    /// Files at or below this size (MB) are uploaded as-is. Consulted by the
    /// host before invoking the core; carried here so one settings document
    /// covers both sides.
    pub threshold_mb: u64,
    /// Encoder speed/quality preset.
    pub preset: EncoderPreset,
    /// Output resolution cap.
    pub max_resolution: MaxResolution,
    /// Per-file encoder deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            target_size_mb: 9,
            threshold_mb: 10,
            preset: EncoderPreset::default(),
            max_resolution: MaxResolution::default(),
            timeout_secs: 300,
        }
    }
}

impl CompressionConfig {
    /// Whether a file of the given size is over the upload threshold and
    /// should be handed to the compressor at all.
    pub fn needs_compression(&self, size_bytes: u64) -> bool {
        size_bytes > self.threshold_mb * 1024 * 1024
    }
}
