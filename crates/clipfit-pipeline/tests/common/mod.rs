//! Shared test harness: fake probe/encoder tool scripts.
//!
//! The fake tools are `/bin/sh` scripts that answer the `-version`
//! validation query with a plausible banner and then play their role in the
//! pipeline (print a duration, or write an output file). Each records the
//! media path it was invoked with so tests can verify temp-file cleanup.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script into `dir`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// A probe that reports the given duration and logs the input path it was
/// asked about to `log`.
pub fn fake_probe(dir: &Path, duration: &str, log: &Path) -> PathBuf {
    fake_tool(
        dir,
        "ffprobe",
        &format!(
            r#"if [ "$1" = "-version" ]; then
  echo "ffprobe version 7.0-fake Copyright"
  exit 0
fi
for a in "$@"; do media="$a"; done
echo "$media" >> "{log}"
echo "{duration}""#,
            log = log.display(),
        ),
    )
}

/// An encoder that writes `ENCODED` to its final (output path) argument and
/// logs that path to `log`.
pub fn fake_encoder(dir: &Path, log: &Path) -> PathBuf {
    fake_tool(
        dir,
        "ffmpeg",
        &format!(
            r#"if [ "$1" = "-version" ]; then
  echo "ffmpeg version 7.0-fake Copyright"
  exit 0
fi
for a in "$@"; do out="$a"; done
echo "$out" >> "{log}"
printf 'ENCODED' > "$out""#,
            log = log.display(),
        ),
    )
}

/// The paths a fake tool logged, one per invocation.
pub fn logged_paths(log: &Path) -> Vec<PathBuf> {
    match std::fs::read_to_string(log) {
        Ok(contents) => contents.lines().map(PathBuf::from).collect(),
        Err(_) => Vec::new(),
    }
}
