//! Builder for executing external tool commands with deadline support.
//!
//! [`ToolCommand::execute`] resolves to exactly one terminal outcome per
//! child: captured output, a spawn error, or a timeout. The child is spawned
//! with `kill_on_drop`, so when the deadline cancels the wait future the
//! process is terminated rather than leaked, and a late exit can never
//! produce a second outcome for the same call.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

/// Default command deadline for tool runs that carry no caller-supplied one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Output captured from a completed tool execution.
///
/// A non-zero exit status is reported here rather than as an error; each
/// call site maps it to its own failure kind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Ways a tool run can fail before producing an exit status.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The operating system could not start the process.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The process did not exit within the deadline and was killed.
    #[error("{tool} did not exit within {timeout:?}")]
    TimedOut { tool: String, timeout: Duration },

    /// I/O failure while collecting the process's output.
    #[error("I/O error waiting for {tool}: {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// A builder for constructing and executing one external tool invocation.
///
/// # Example
///
/// ```no_run
/// use clipfit_av::ToolCommand;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), clipfit_av::ExecError> {
/// let output = ToolCommand::new(Path::new("/usr/bin/ffprobe"))
///     .arg("-version")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, s: impl Into<String>) -> Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`ExecError::Spawn`] if the process could not be started.
    /// - [`ExecError::TimedOut`] if the deadline expired; the child is killed.
    /// - [`ExecError::Wait`] on I/O failure while collecting output.
    pub async fn execute(&self) -> Result<ToolOutput, ExecError> {
        let tool = self.program_name();

        tracing::debug!(
            tool = %tool,
            args = ?self.args,
            timeout = ?self.timeout,
            "running external tool"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Terminates the child when the timeout drops the wait future.
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| ExecError::Spawn {
            tool: tool.clone(),
            source: e,
        })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ToolOutput {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Err(e)) => Err(ExecError::Wait { tool, source: e }),
            Err(_elapsed) => {
                tracing::warn!(tool = %tool, timeout = ?self.timeout, "tool run timed out, killing");
                Err(ExecError::TimedOut {
                    tool,
                    timeout: self.timeout,
                })
            }
        }
    }
}
