//! Fast-start container rewriting via ffmpeg.
//!
//! Stream-copies an mp4 while relocating the moov atom ahead of the media
//! data so playback can begin before the whole file downloads. No
//! re-encoding takes place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::ProcessingError;
use crate::traits::ContainerRewriter;

/// Output path for a rewrite: the input path with `.faststart.mp4` appended,
/// so the output lands in the same (request-scoped) directory as the input.
fn faststart_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".faststart.mp4");
    PathBuf::from(name)
}

/// ffmpeg-backed rewriter.
pub struct FfmpegRewriter {
    ffmpeg_path: String,
}

impl FfmpegRewriter {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        FfmpegRewriter {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl ContainerRewriter for FfmpegRewriter {
    async fn rewrite(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        let output_path = faststart_output_path(input);
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::RewriteFailed {
                path: input.to_path_buf(),
                reason: format!("failed to execute {}: {}", self.ffmpeg_path, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                path = %input.display(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "ffmpeg fast-start rewrite exited non-zero"
            );
            return Err(ProcessingError::RewriteFailed {
                path: input.to_path_buf(),
                reason: stderr.trim().to_string(),
            });
        }

        tracing::info!(
            path = %input.display(),
            output = %output_path.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rewrote container for fast start"
        );

        Ok(output_path)
    }
}
