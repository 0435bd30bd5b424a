//! # clipfit-av
//!
//! External tool resolution and subprocess plumbing for the clipfit
//! compression pipeline.
//!
//! This crate provides:
//!
//! - **Binary location** ([`BinaryLocator`]) -- discover, validate, and cache
//!   the paths of the probe (ffprobe) and encoder (ffmpeg) executables using
//!   fixed per-platform candidate lists instead of `PATH` lookup.
//! - **Command execution** ([`ToolCommand`]) -- async builder with deadline
//!   support and guaranteed child termination on timeout.
//! - **Duration probing** ([`probe::measure_duration`]) -- read a clip's
//!   duration in seconds from the probe tool's plain-text output.
//! - **Encode math** ([`encode`]) -- target-size bitrate computation and the
//!   scale/pad filter table for resolution caps.

pub mod command;
pub mod encode;
pub mod locate;
pub mod probe;

// ---- Re-exports for convenience ----

pub use command::{ExecError, ToolCommand, ToolOutput};
pub use encode::{encoder_args, scale_pad_filter, video_bitrate_kbps, MIN_VIDEO_BITRATE_KBPS};
pub use locate::{candidate_paths, BinaryLocator, Platform, ResolvedBinary};
pub use probe::measure_duration;
