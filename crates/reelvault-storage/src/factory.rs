use crate::memory::MemoryAssetStore;
use crate::s3::S3AssetStore;
use crate::traits::{AssetStore, StorageError, StorageResult};
use reelvault_core::{Config, StorageBackend};
use std::sync::Arc;

/// Create an asset store backend based on configuration
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn AssetStore>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint.clone();

            let store = S3AssetStore::new(bucket, region, endpoint).await?;
            Ok(Arc::new(store))
        }

        StorageBackend::Memory => {
            let bucket = config
                .s3_bucket
                .clone()
                .unwrap_or_else(|| "reelvault".to_string());
            Ok(Arc::new(MemoryAssetStore::new(bucket)))
        }
    }
}
