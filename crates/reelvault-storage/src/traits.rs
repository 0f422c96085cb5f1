//! Storage abstraction trait
//!
//! This module defines the `AssetStore` trait that all object-store backends
//! must implement, and the error type their operations return.

use async_trait::async_trait;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;

use reelvault_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed for {key}: {reason}")]
    PutFailed { key: String, reason: String },

    #[error("Delete failed for {key}: {reason}")]
    DeleteFailed { key: String, reason: String },

    #[error("Presign failed for {key}: {reason}")]
    PresignFailed { key: String, reason: String },

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Byte source for uploads. Read to EOF by the backend.
pub type ByteReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Object-store gateway.
///
/// Owns every mutation of committed objects; no other component issues store
/// writes or deletes. Implementations must make `put` idempotent by key (a
/// retry with the same key overwrites) and `delete` safe to call for keys
/// that no longer exist.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stream bytes to the store under `key`.
    async fn put(&self, key: &str, content_type: &str, reader: ByteReader) -> StorageResult<()>;

    /// Remove the object under `key`. Absent objects are not an error;
    /// transport failures are surfaced, never swallowed.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Construct a time-limited signed GET URL for `key`. Deterministic
    /// given (key, ttl, current signing credentials); no network calls
    /// beyond signing.
    async fn presign(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if an object exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// The bucket this store writes into; the namespace half of every
    /// object reference minted from a `put`.
    fn bucket(&self) -> &str;
}
