use std::path::PathBuf;

use reelvault_core::AppError;

/// Processing operation errors. Each variant carries the offending path so
/// the orchestrator can log failures with enough context.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("ffprobe failed for {}: {}", .path.display(), .reason)]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("container rewrite failed for {}: {}", .path.display(), .reason)]
    RewriteFailed { path: PathBuf, reason: String },

    #[error("invalid geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        let message = err.to_string();
        match err {
            ProcessingError::ProbeFailed { .. } => AppError::ProbeFailed(message),
            ProcessingError::RewriteFailed { .. } => AppError::RewriteFailed(message),
            ProcessingError::InvalidGeometry { .. } => AppError::InvalidGeometry(message),
            ProcessingError::Io(_) => AppError::Internal(message),
        }
    }
}
