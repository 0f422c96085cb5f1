//! Asset record repository.
//!
//! The relational store holding video/user metadata is an external
//! collaborator; the pipeline sees it as a get/update/delete interface
//! keyed by asset id. `MemoryAssetRepository` backs tests and local
//! development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use reelvault_core::models::MediaAsset;
use reelvault_core::AppError;

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Fetch an asset record; None when no record exists for the id.
    async fn get(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError>;

    /// Replace the record for `asset.id`. The record must already exist;
    /// assets are created with their parent video record, not by the
    /// ingestion pipeline.
    async fn update(&self, asset: &MediaAsset) -> Result<(), AppError>;

    /// Remove the record.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Map-backed repository for tests and local development.
#[derive(Clone, Default)]
pub struct MemoryAssetRepository {
    records: Arc<Mutex<HashMap<Uuid, MediaAsset>>>,
}

impl MemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, as the (external) video-creation flow would.
    pub fn insert(&self, asset: MediaAsset) {
        self.records.lock().unwrap().insert(asset.id, asset);
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepository {
    async fn get(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, asset: &MediaAsset) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&asset.id) {
            Some(existing) => {
                *existing = asset.clone();
                Ok(())
            }
            None => Err(AppError::Persist(format!(
                "asset {} does not exist",
                asset.id
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.records.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::Persist(format!("asset {} does not exist", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::models::MediaKind;

    #[tokio::test]
    async fn update_requires_an_existing_record() {
        let repo = MemoryAssetRepository::new();
        let asset = MediaAsset::new(Uuid::new_v4(), Uuid::new_v4(), MediaKind::Video);

        let err = repo.update(&asset).await.unwrap_err();
        assert!(matches!(err, AppError::Persist(_)));

        repo.insert(asset.clone());
        assert!(repo.update(&asset).await.is_ok());
        assert_eq!(repo.record_count(), 1);
    }
}
