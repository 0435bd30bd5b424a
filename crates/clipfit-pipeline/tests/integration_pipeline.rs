//! End-to-end pipeline tests against fake probe/encoder tools.

#![cfg(unix)]

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;

use clipfit_av::BinaryLocator;
use clipfit_core::{
    CompressionRequest, EncoderPreset, Error, MaxResolution, ToolKind, ToolPathsConfig,
};
use clipfit_pipeline::CompressionPipeline;

use common::{fake_encoder, fake_probe, fake_tool, logged_paths};

fn pipeline_for(probe: PathBuf, encoder: PathBuf) -> CompressionPipeline {
    CompressionPipeline::new(
        Arc::new(BinaryLocator::new()),
        ToolPathsConfig {
            probe_path: Some(probe),
            encoder_path: Some(encoder),
        },
    )
}

fn request() -> CompressionRequest {
    CompressionRequest {
        input_bytes: b"not really media, but the tools are fake too".to_vec(),
        file_name: "holiday clip.mp4".to_string(),
        target_size_bytes: 9 * 1024 * 1024,
        preset: EncoderPreset::Medium,
        max_resolution: MaxResolution::Original,
        timeout: Duration::from_secs(10),
    }
}

#[tokio::test]
async fn compresses_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let probe_log = dir.path().join("probe.log");
    let encode_log = dir.path().join("encode.log");
    let probe = fake_probe(dir.path(), "120.0", &probe_log);
    let encoder = fake_encoder(dir.path(), &encode_log);

    let pipeline = pipeline_for(probe, encoder);
    let data = pipeline.compress(&request()).await.unwrap();
    assert_eq!(data, b"ENCODED");

    // Both temp artifacts are gone afterward.
    let probed = logged_paths(&probe_log);
    let encoded = logged_paths(&encode_log);
    assert_eq!(probed.len(), 1);
    assert_eq!(encoded.len(), 1);
    assert_ne!(probed[0], encoded[0]);
    assert!(!probed[0].exists(), "temp input not cleaned up");
    assert!(!encoded[0].exists(), "temp output not cleaned up");
}

#[tokio::test]
async fn probe_failure_is_typed_and_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let encode_log = dir.path().join("encode.log");
    let probe = fake_tool(
        dir.path(),
        "ffprobe",
        r#"if [ "$1" = "-version" ]; then echo "ffprobe version 7.0-fake"; exit 0; fi
echo "invalid data found when processing input" >&2
exit 1"#,
    );
    let encoder = fake_encoder(dir.path(), &encode_log);

    let pipeline = pipeline_for(probe, encoder);
    let err = pipeline.compress(&request()).await.unwrap_err();
    assert_matches!(&err, Error::ProbeFailed(msg) if msg.contains("invalid data"));

    // The encoder never ran.
    assert!(logged_paths(&encode_log).is_empty());
}

#[tokio::test]
async fn tiny_budget_refuses_before_spawning_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let probe_log = dir.path().join("probe.log");
    let encode_log = dir.path().join("encode.log");
    // An hour-long clip against a 1 MB budget: far below the 100 kbps floor.
    let probe = fake_probe(dir.path(), "3600.0", &probe_log);
    let encoder = fake_encoder(dir.path(), &encode_log);

    let pipeline = pipeline_for(probe, encoder);
    let mut req = request();
    req.target_size_bytes = 1024 * 1024;

    let err = pipeline.compress(&req).await.unwrap_err();
    assert_matches!(err, Error::BitrateTooLow { kbps, floor: 100 } if kbps < 100);
    assert!(err.to_string().contains("kbps"));

    assert!(logged_paths(&encode_log).is_empty(), "encoder must not be spawned");
    let probed = logged_paths(&probe_log);
    assert!(!probed[0].exists(), "temp input not cleaned up");
}

#[tokio::test]
async fn encoder_failure_surfaces_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let probe_log = dir.path().join("probe.log");
    let probe = fake_probe(dir.path(), "120.0", &probe_log);
    let encoder = fake_tool(
        dir.path(),
        "ffmpeg",
        r#"if [ "$1" = "-version" ]; then echo "ffmpeg version 7.0-fake"; exit 0; fi
echo "unknown encoder 'libx264'" >&2
exit 1"#,
    );

    let pipeline = pipeline_for(probe, encoder);
    let err = pipeline.compress(&request()).await.unwrap_err();
    assert_matches!(&err, Error::EncodeFailed(msg) if msg.contains("unknown encoder"));
}

#[tokio::test]
async fn hung_encoder_times_out_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let probe_log = dir.path().join("probe.log");
    let probe = fake_probe(dir.path(), "120.0", &probe_log);
    let encoder = fake_tool(
        dir.path(),
        "ffmpeg",
        r#"if [ "$1" = "-version" ]; then echo "ffmpeg version 7.0-fake"; exit 0; fi
sleep 30"#,
    );

    let pipeline = pipeline_for(probe, encoder);
    let mut req = request();
    req.timeout = Duration::from_millis(200);

    let start = Instant::now();
    let err = pipeline.compress(&req).await.unwrap_err();
    // The deadline is the one and only terminal outcome for this request.
    assert_matches!(err, Error::Timeout { timeout_ms: 200 });
    assert!(start.elapsed() < Duration::from_secs(10));

    let probed = logged_paths(&probe_log);
    assert!(!probed[0].exists(), "temp input not cleaned up");
}

#[tokio::test]
async fn test_tools_populates_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let probe_log = dir.path().join("probe.log");
    let encode_log = dir.path().join("encode.log");
    let probe = fake_probe(dir.path(), "120.0", &probe_log);
    let encoder = fake_encoder(dir.path(), &encode_log);

    let locator = Arc::new(BinaryLocator::new());
    let pipeline = CompressionPipeline::new(
        locator.clone(),
        ToolPathsConfig {
            probe_path: Some(probe.clone()),
            encoder_path: Some(encoder.clone()),
        },
    );

    let report = pipeline.test_tools_report().await;
    assert!(report.success);
    assert!(report.error.is_none());

    assert_eq!(locator.current_path(ToolKind::Probe).unwrap(), probe);
    assert_eq!(locator.current_path(ToolKind::Encoder).unwrap(), encoder);
}

#[tokio::test]
async fn test_tools_reports_resolution_failure() {
    let pipeline = CompressionPipeline::new(
        Arc::new(BinaryLocator::new()),
        ToolPathsConfig {
            probe_path: Some(PathBuf::from("/nonexistent/ffprobe_xyz")),
            encoder_path: None,
        },
    );

    let report = pipeline.test_tools_report().await;
    assert!(!report.success);
    assert!(report.error.unwrap().contains("ffprobe"));
}
