//! The compression orchestrator.

use std::sync::Arc;

use clipfit_av::command::{ExecError, ToolCommand};
use clipfit_av::{
    encoder_args, measure_duration, video_bitrate_kbps, BinaryLocator, MIN_VIDEO_BITRATE_KBPS,
};
use clipfit_core::{
    CompressionRequest, Error, Result, ToolKind, ToolPathsConfig, ToolTestReport,
};

use crate::workspace::EncodeWorkspace;

/// Drives one compress-to-target-size request end to end.
///
/// Holds a handle to the process-wide [`BinaryLocator`] (the only state
/// shared between concurrent requests) and the host's configured tool path
/// overrides. Each `compress` call owns its temp files and child processes
/// exclusively; within a call the steps are strictly sequential.
#[derive(Debug, Clone)]
pub struct CompressionPipeline {
    locator: Arc<BinaryLocator>,
    tools: ToolPathsConfig,
}

impl CompressionPipeline {
    /// Create a pipeline over a shared locator and tool path overrides.
    pub fn new(locator: Arc<BinaryLocator>, tools: ToolPathsConfig) -> Self {
        Self { locator, tools }
    }

    /// Resolve both tool kinds without compressing anything.
    ///
    /// Side effect: populates the locator's resolution cache, so a
    /// subsequent `compress` call does not re-validate.
    pub async fn test_tools(&self) -> Result<()> {
        self.locator
            .resolve(self.tools.probe_path.as_deref(), ToolKind::Probe)
            .await?;
        self.locator
            .resolve(self.tools.encoder_path.as_deref(), ToolKind::Encoder)
            .await?;
        Ok(())
    }

    /// [`CompressionPipeline::test_tools`] folded into the host's
    /// `{success, error}` report shape.
    pub async fn test_tools_report(&self) -> ToolTestReport {
        ToolTestReport::from_result(&self.test_tools().await)
    }

    /// Compress a clip to the requested size target.
    ///
    /// Every failure is terminal for this request; the core never retries.
    /// Temp artifacts are deleted on all exit paths.
    pub async fn compress(&self, request: &CompressionRequest) -> Result<Vec<u8>> {
        let workspace = EncodeWorkspace::for_file(&request.file_name)?;
        let result = self.run(request, &workspace).await;
        workspace.cleanup();

        match &result {
            Ok(data) => tracing::info!(
                file = %request.file_name,
                output_bytes = data.len(),
                "compression finished"
            ),
            Err(e) => tracing::warn!(
                file = %request.file_name,
                kind = e.kind(),
                error = %e,
                "compression failed"
            ),
        }
        result
    }

    async fn run(&self, request: &CompressionRequest, ws: &EncodeWorkspace) -> Result<Vec<u8>> {
        tokio::fs::write(ws.input(), &request.input_bytes).await?;

        let probe = self
            .locator
            .resolve(self.tools.probe_path.as_deref(), ToolKind::Probe)
            .await?;
        let duration = measure_duration(&probe, ws.input()).await?;

        let kbps = video_bitrate_kbps(request.target_size_bytes, duration);
        if kbps < MIN_VIDEO_BITRATE_KBPS {
            return Err(Error::BitrateTooLow {
                kbps,
                floor: MIN_VIDEO_BITRATE_KBPS,
            });
        }
        tracing::debug!(
            file = %request.file_name,
            duration,
            video_kbps = kbps,
            "computed encode bitrate"
        );

        let encoder = self
            .locator
            .resolve(self.tools.encoder_path.as_deref(), ToolKind::Encoder)
            .await?;

        let output = ToolCommand::new(encoder)
            .args(encoder_args(
                ws.input(),
                ws.output(),
                kbps,
                request.preset,
                request.max_resolution,
            ))
            .timeout(request.timeout)
            .execute()
            .await
            .map_err(|e| match e {
                ExecError::TimedOut { .. } => Error::Timeout {
                    timeout_ms: request.timeout.as_millis() as u64,
                },
                ExecError::Spawn { tool, source } => {
                    Error::spawn_failed(tool, source.to_string())
                }
                ExecError::Wait { tool, source } => {
                    Error::spawn_failed(tool, source.to_string())
                }
            })?;

        if !output.success() {
            return Err(Error::encode_failed(format!(
                "exited with {}: {}",
                output.status,
                output.stderr.trim()
            )));
        }

        let data = tokio::fs::read(ws.output()).await?;
        Ok(data)
    }
}
