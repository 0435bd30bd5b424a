//! Scratch workspace for one compression request.
//!
//! Each request owns its own temp directory under the system temp root with
//! uuid-unique input/output file names, so concurrent requests can never
//! collide. Cleanup is best-effort on every exit path: the explicit
//! [`EncodeWorkspace::cleanup`] logs and swallows deletion failures, and the
//! owned [`TempDir`] removes the directory on drop as a backstop.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use clipfit_core::Result;

/// Per-request temp directory holding the encode input and output files.
#[derive(Debug)]
pub struct EncodeWorkspace {
    dir: Option<TempDir>,
    input: PathBuf,
    output: PathBuf,
}

impl EncodeWorkspace {
    /// Create a workspace for compressing the named file.
    ///
    /// The container extension is inferred from the original file name and
    /// defaults to `mp4` when the name carries none.
    pub fn for_file(file_name: &str) -> Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4");

        let dir = tempfile::Builder::new().prefix("clipfit-").tempdir()?;
        let token = uuid::Uuid::new_v4().simple().to_string();
        let input = dir.path().join(format!("{token}-in.{ext}"));
        let output = dir.path().join(format!("{token}-out.{ext}"));

        Ok(Self {
            dir: Some(dir),
            input,
            output,
        })
    }

    /// Path the raw input bytes are written to.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path the encoder writes the compressed clip to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Delete the workspace and everything in it.
    ///
    /// Deletion failures do not affect the request outcome; they are logged
    /// and swallowed.
    pub fn cleanup(mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch dir");
            }
        }
    }
}
