//! Media-domain types shared across the clipfit crates.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CompressionConfig;
use crate::error::Error;

/// Which external tool a path, validation, or invocation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Media inspection tool (ffprobe): reports container metadata.
    Probe,
    /// Transcoding tool (ffmpeg): re-encodes media.
    Encoder,
}

impl ToolKind {
    /// Canonical executable name, also the substring expected in the
    /// tool's version-query output.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolKind::Probe => "ffprobe",
            ToolKind::Encoder => "ffmpeg",
        }
    }

    /// Argument that makes the tool print its version banner.
    pub fn version_arg(&self) -> &'static str {
        // Both ffmpeg-family tools use a single dash, unlike GNU tools.
        "-version"
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Encoder speed/quality tradeoff knob, passed through verbatim as the
/// x264 `-preset` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    #[default]
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl EncoderPreset {
    /// The literal preset name handed to the encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderPreset::Ultrafast => "ultrafast",
            EncoderPreset::Superfast => "superfast",
            EncoderPreset::Veryfast => "veryfast",
            EncoderPreset::Faster => "faster",
            EncoderPreset::Fast => "fast",
            EncoderPreset::Medium => "medium",
            EncoderPreset::Slow => "slow",
            EncoderPreset::Slower => "slower",
            EncoderPreset::Veryslow => "veryslow",
        }
    }
}

impl fmt::Display for EncoderPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum output resolution selector.
///
/// [`MaxResolution::Original`] is the "keep original" sentinel: no scaling
/// filter is applied. The named variants cap the output within the given
/// bounds while preserving aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxResolution {
    #[default]
    #[serde(rename = "original")]
    Original,
    #[serde(rename = "480")]
    P480,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "1080")]
    P1080,
}

impl MaxResolution {
    /// Maximum output dimensions (width, height), or `None` for the
    /// keep-original sentinel. All bounds are even in both dimensions.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match self {
            MaxResolution::Original => None,
            MaxResolution::P480 => Some((854, 480)),
            MaxResolution::P720 => Some((1280, 720)),
            MaxResolution::P1080 => Some((1920, 1080)),
        }
    }
}

/// Immutable input to one compression request.
///
/// Owned by the caller; carries no identity beyond the call itself.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    /// Raw bytes of the oversized media file.
    pub input_bytes: Vec<u8>,
    /// Original filename, used only for extension inference.
    pub file_name: String,
    /// Desired maximum output size in bytes.
    pub target_size_bytes: u64,
    /// Encoder speed/quality preset.
    pub preset: EncoderPreset,
    /// Output resolution cap.
    pub max_resolution: MaxResolution,
    /// Wall-clock deadline for the encoder child process.
    pub timeout: Duration,
}

impl CompressionRequest {
    /// Build a request from raw bytes and the host's compression settings,
    /// converting megabytes to bytes and seconds to a [`Duration`].
    pub fn from_config(
        input_bytes: Vec<u8>,
        file_name: impl Into<String>,
        config: &CompressionConfig,
    ) -> Self {
        Self {
            input_bytes,
            file_name: file_name.into(),
            target_size_bytes: config.target_size_mb * 1024 * 1024,
            preset: config.preset,
            max_resolution: config.max_resolution,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Host-boundary report for a tool availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolTestReport {
    /// Whether both tools resolved and validated.
    pub success: bool,
    /// Human-readable failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolTestReport {
    /// Fold a resolution result into the `{success, error}` shape the host
    /// consumes.
    pub fn from_result(result: &Result<(), Error>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                error: None,
            },
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_kind_names() {
        assert_eq!(ToolKind::Probe.tool_name(), "ffprobe");
        assert_eq!(ToolKind::Encoder.tool_name(), "ffmpeg");
        assert_eq!(ToolKind::Encoder.version_arg(), "-version");
    }

    #[test]
    fn preset_round_trips_through_serde() {
        let json = serde_json::to_string(&EncoderPreset::Veryfast).unwrap();
        assert_eq!(json, "\"veryfast\"");
        let back: EncoderPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EncoderPreset::Veryfast);
    }

    #[test]
    fn resolution_labels() {
        let res: MaxResolution = serde_json::from_str("\"720\"").unwrap();
        assert_eq!(res, MaxResolution::P720);
        let res: MaxResolution = serde_json::from_str("\"original\"").unwrap();
        assert_eq!(res, MaxResolution::Original);
        assert_eq!(serde_json::to_string(&MaxResolution::P1080).unwrap(), "\"1080\"");
    }

    #[test]
    fn resolution_bounds_are_even() {
        for res in [MaxResolution::P480, MaxResolution::P720, MaxResolution::P1080] {
            let (w, h) = res.bounds().unwrap();
            assert_eq!(w % 2, 0);
            assert_eq!(h % 2, 0);
        }
        assert!(MaxResolution::Original.bounds().is_none());
    }

    #[test]
    fn request_from_config_converts_units() {
        let cfg = CompressionConfig {
            target_size_mb: 9,
            timeout_secs: 120,
            ..CompressionConfig::default()
        };
        let req = CompressionRequest::from_config(vec![1, 2, 3], "clip.mp4", &cfg);
        assert_eq!(req.target_size_bytes, 9 * 1024 * 1024);
        assert_eq!(req.timeout, Duration::from_secs(120));
        assert_eq!(req.file_name, "clip.mp4");
    }

    #[test]
    fn tool_test_report_shapes() {
        let ok = ToolTestReport::from_result(&Ok(()));
        assert!(ok.success);
        let json = serde_json::to_string(&ok).unwrap();
        assert!(!json.contains("error"));

        let err = ToolTestReport::from_result(&Err(Error::not_resolved("ffmpeg")));
        assert!(!err.success);
        assert!(err.error.unwrap().contains("ffmpeg"));
    }
}
