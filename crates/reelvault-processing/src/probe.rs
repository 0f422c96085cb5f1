//! Geometry probing via ffprobe.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::ProcessingError;
use crate::traits::{Dimensions, MediaProber};

/// The subset of ffprobe's JSON output this pipeline reads. Everything else
/// in the stream description is ignored.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Extract the first stream's dimensions from raw ffprobe JSON.
///
/// Split out of the process invocation so parsing is testable without
/// spawning ffprobe.
fn parse_dimensions(stdout: &[u8], path: &Path) -> Result<Dimensions, ProcessingError> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProcessingError::ProbeFailed {
            path: path.to_path_buf(),
            reason: format!("unparseable ffprobe output: {}", e),
        })?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| ProcessingError::ProbeFailed {
            path: path.to_path_buf(),
            reason: "no video stream found".to_string(),
        })?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(Dimensions { width, height }),
        _ => Err(ProcessingError::ProbeFailed {
            path: path.to_path_buf(),
            reason: "video stream is missing width or height".to_string(),
        }),
    }
}

/// ffprobe-backed prober. One child process per call.
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        FfprobeProber {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProcessingError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::ProbeFailed {
                path: path.to_path_buf(),
                reason: format!("failed to execute {}: {}", self.ffprobe_path, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                path = %path.display(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "ffprobe exited non-zero"
            );
            return Err(ProcessingError::ProbeFailed {
                path: path.to_path_buf(),
                reason: stderr.trim().to_string(),
            });
        }

        let dims = parse_dimensions(&output.stdout, path)?;

        tracing::info!(
            path = %path.display(),
            width = dims.width,
            height = dims.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Probed video geometry"
        );

        Ok(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_stream_dimensions() {
        let json = br#"{
            "streams": [
                {
                    "index": 0,
                    "codec_name": "h264",
                    "codec_type": "video",
                    "width": 1920,
                    "height": 1080,
                    "pix_fmt": "yuv420p",
                    "r_frame_rate": "30/1"
                }
            ]
        }"#;
        let dims = parse_dimensions(json, Path::new("input.mp4")).unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn empty_stream_list_is_a_probe_failure() {
        let err = parse_dimensions(br#"{"streams": []}"#, Path::new("input.mp4")).unwrap_err();
        assert!(matches!(err, ProcessingError::ProbeFailed { .. }));
        assert!(err.to_string().contains("no video stream"));
    }

    #[test]
    fn garbage_output_is_a_probe_failure() {
        let err = parse_dimensions(b"not json at all", Path::new("input.mp4")).unwrap_err();
        assert!(matches!(err, ProcessingError::ProbeFailed { .. }));
    }

    #[test]
    fn stream_without_geometry_is_a_probe_failure() {
        let err = parse_dimensions(
            br#"{"streams": [{"index": 0, "codec_type": "video"}]}"#,
            Path::new("input.mp4"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing width or height"));
    }
}
