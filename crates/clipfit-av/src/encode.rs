//! Bitrate computation and encoder argument assembly.
//!
//! The video bitrate is back-calculated from the full size budget and the
//! probed duration. The fixed audio allocation is additive, so the achieved
//! size is roughly `(video + audio bitrate) x duration` and slightly
//! overshoots the nominal target by the audio budget. Known behavior, kept
//! as-is.

use std::path::Path;

use clipfit_core::{EncoderPreset, MaxResolution};

/// Fixed audio track bitrate (kbps).
pub const AUDIO_BITRATE_KBPS: u64 = 128;

/// Video bitrates below this floor produce unwatchable output; encoding is
/// refused instead.
pub const MIN_VIDEO_BITRATE_KBPS: u64 = 100;

/// Compute the target video bitrate in kbps for a size budget and duration:
/// `floor(target_size_bytes * 8 / duration_secs / 1000)`.
pub fn video_bitrate_kbps(target_size_bytes: u64, duration_secs: f64) -> u64 {
    (target_size_bytes as f64 * 8.0 / duration_secs / 1000.0).floor() as u64
}

/// Video filter capping the output within the selected bounds.
///
/// Returns `None` for the keep-original sentinel. Otherwise the clip is
/// scaled down to fit the bounds preserving aspect ratio, then padded up to
/// the next even dimensions (H.264 4:2:0 requires both dimensions even).
pub fn scale_pad_filter(max: MaxResolution) -> Option<String> {
    let (w, h) = max.bounds()?;
    Some(format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad=ceil(iw/2)*2:ceil(ih/2)*2:(ow-iw)/2:(oh-ih)/2"
    ))
}

/// Assemble the encoder invocation for one compression pass.
///
/// One-pass H.264 encode at a constant-bitrate-style target (`-maxrate`
/// equals the target, `-bufsize` twice it), fixed AAC audio, metadata
/// passthrough, and `+faststart` so the index is relocated for progressive
/// playback.
pub fn encoder_args(
    input: &Path,
    output: &Path,
    video_kbps: u64,
    preset: EncoderPreset,
    max_resolution: MaxResolution,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-c:v".into(),
        "libx264".into(),
        "-b:v".into(),
        format!("{video_kbps}k"),
        "-maxrate".into(),
        format!("{video_kbps}k"),
        "-bufsize".into(),
        format!("{}k", video_kbps * 2),
        "-preset".into(),
        preset.as_str().into(),
    ];

    if let Some(filter) = scale_pad_filter(max_resolution) {
        args.push("-vf".into());
        args.push(filter);
    }

    args.extend([
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        format!("{AUDIO_BITRATE_KBPS}k"),
        "-map_metadata".into(),
        "0".into(),
        "-movflags".into(),
        "+faststart".into(),
        output.to_string_lossy().into_owned(),
    ]);

    args
}
