//! Capability traits for the external media tools.
//!
//! The ingestion service depends on these traits, not on the ffmpeg/ffprobe
//! implementations, so tests drive the pipeline with scripted fakes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::ProcessingError;

/// Width/height of the first video stream of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Geometry probing capability.
///
/// One external process per call; a failure is surfaced immediately, there
/// are no retries.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProcessingError>;
}

/// Fast-start container rewriting capability.
///
/// Produces a new local file with identical streams but with container
/// metadata relocated for progressive playback. The input file is left
/// untouched; the caller owns the lifecycle of both input and output.
#[async_trait]
pub trait ContainerRewriter: Send + Sync {
    async fn rewrite(&self, input: &Path) -> Result<PathBuf, ProcessingError>;
}
