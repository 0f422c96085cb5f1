//! Reelvault Storage Library
//!
//! The object-store gateway of the ingestion pipeline: the `AssetStore`
//! trait plus its S3 and in-memory backends, the storage-key builder, and a
//! config-driven factory.
//!
//! # Storage key format
//!
//! Keys partition the namespace by classification:
//!
//! - **Video**: `{classification}/{uuid}.{ext}` (e.g. `landscape/{uuid}.mp4`)
//! - **Thumbnail**: `{uuid}.{ext}`
//!
//! A key is minted once and never reused; replacing an asset allocates a
//! fresh key. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
pub mod memory;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use memory::MemoryAssetStore;
pub use reelvault_core::StorageBackend;
pub use s3::S3AssetStore;
pub use traits::{AssetStore, ByteReader, StorageError, StorageResult};
