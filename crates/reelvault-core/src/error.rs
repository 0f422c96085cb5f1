//! Error types module
//!
//! This module provides the core error types used throughout the ingestion
//! pipeline. Every component-level failure is unified under the `AppError`
//! enum, which carries enough context (offending path or key) for logging
//! and maps to exactly one caller-visible failure.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client-side issues like oversized payloads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response
/// characteristics without the transport layer matching on variants.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Container rewrite failed: {0}")]
    RewriteFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Persist error: {0}")]
    Persist(String),

    #[error("Malformed object reference: {0}")]
    MalformedObjectRef(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations following Rust best practices
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
/// Kept in one function so status mapping stays reviewable in one place.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::NotFound(_) => (404, "NOT_FOUND", LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", LogLevel::Warn),
        AppError::UnsupportedMediaType(_) => (415, "UNSUPPORTED_MEDIA_TYPE", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::InvalidGeometry(_) => (422, "INVALID_GEOMETRY", LogLevel::Warn),
        AppError::ProbeFailed(_) => (500, "PROBE_FAILED", LogLevel::Error),
        AppError::RewriteFailed(_) => (500, "REWRITE_FAILED", LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::Persist(_) => (500, "PERSIST_ERROR", LogLevel::Error),
        AppError::MalformedObjectRef(_) => (500, "MALFORMED_OBJECT_REF", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(AppError::Forbidden("x".into()).http_status_code(), 403);
        assert_eq!(
            AppError::UnsupportedMediaType("image/gif".into()).http_status_code(),
            415
        );
        assert_eq!(
            AppError::PayloadTooLarge("x".into()).http_status_code(),
            413
        );
        assert_eq!(
            AppError::InvalidGeometry("0 height".into()).http_status_code(),
            422
        );
    }

    #[test]
    fn pipeline_failures_map_to_server_errors() {
        for err in [
            AppError::ProbeFailed("x".into()),
            AppError::RewriteFailed("x".into()),
            AppError::Storage("x".into()),
            AppError::Persist("x".into()),
            AppError::MalformedObjectRef("x".into()),
        ] {
            assert_eq!(err.http_status_code(), 500);
            assert_eq!(err.log_level(), LogLevel::Error);
        }
    }
}
