//! Reelvault Services Layer
//!
//! This crate is the **business service layer**: it hosts the ingestion
//! orchestrator that sequences validation, buffering, probing,
//! classification, container rewriting, storage, and persistence for each
//! upload, plus the record-repository seam the orchestrator persists
//! through. HTTP handling and authentication live outside this workspace;
//! callers arrive with an already-authenticated owner id.

pub mod ingest;
pub mod repository;

// Re-export commonly used types
pub use ingest::IngestService;
pub use repository::{AssetRepository, MemoryAssetRepository};
