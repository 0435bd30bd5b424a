//! Duration measurement via the external probe tool.

use std::path::Path;

use clipfit_core::{Error, Result};

use crate::command::{ExecError, ToolCommand};

/// Measure a media file's duration in seconds.
///
/// Invokes the probe tool so that it prints only the container duration,
/// unformatted: a single plain-text number on stdout. The caller supplies an
/// already-resolved probe binary path.
///
/// # Errors
///
/// - [`Error::ProbeFailed`] on a non-zero exit (stderr is surfaced), on
///   unparseable output, or when the parsed duration is not a positive
///   finite number.
/// - [`Error::SpawnFailed`] when the process could not start.
pub async fn measure_duration(probe_bin: &Path, input: &Path) -> Result<f64> {
    let output = ToolCommand::new(probe_bin)
        .args(["-v", "error"])
        .args(["-show_entries", "format=duration"])
        .args(["-of", "default=noprint_wrappers=1:nokey=1"])
        .arg(input.to_string_lossy())
        .execute()
        .await
        .map_err(|e| match e {
            ExecError::Spawn { tool, source } => Error::spawn_failed(tool, source.to_string()),
            other => Error::probe_failed(other.to_string()),
        })?;

    if !output.success() {
        return Err(Error::probe_failed(format!(
            "probe exited with {}: {}",
            output.status,
            output.stderr.trim()
        )));
    }

    let raw = output.stdout.trim();
    let duration: f64 = raw
        .parse()
        .map_err(|_| Error::probe_failed(format!("unparseable duration {raw:?}")))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::probe_failed(format!(
            "duration must be positive, got {duration}"
        )));
    }

    tracing::debug!(input = %input.display(), duration, "probed duration");
    Ok(duration)
}
