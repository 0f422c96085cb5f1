//! Reelvault Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! object reference encoding shared across all Reelvault components.

pub mod config;
pub mod error;
pub mod models;
pub mod object_ref;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use object_ref::ObjectRef;
pub use storage_types::StorageBackend;
