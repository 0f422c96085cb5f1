//! In-memory asset store for tests and local development.

use crate::traits::{AssetStore, ByteReader, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Asset store backed by a process-local map.
///
/// Presigned URLs are deterministic given (key, ttl) and mimic the S3 query
/// shape so read-path assertions look like the real thing.
#[derive(Clone)]
pub struct MemoryAssetStore {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryAssetStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        MemoryAssetStore {
            bucket: bucket.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if an object is present (for test assertions).
    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Get stored bytes (for test assertions).
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).map(|o| o.data.clone())
    }

    /// Content type recorded at put time (for test assertions).
    pub fn object_content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    /// Number of stored objects (for test assertions).
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// All stored keys (for test assertions).
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, key: &str, content_type: &str, mut reader: ByteReader) -> StorageResult<()> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let mut data = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut data)
            .await
            .map_err(|e| StorageError::PutFailed {
                key: key.to_string(),
                reason: format!("failed to read from stream: {}", e),
            })?;

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        // Absent keys are fine; delete is no-op-safe.
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn presign(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if !self.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!(
            "https://{}.example.invalid/{}?X-Amz-Expires={}&X-Amz-Signature=memory",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.contains_key(key))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_from(data: &[u8]) -> ByteReader {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    #[tokio::test]
    async fn put_then_presign_and_delete() {
        let store = MemoryAssetStore::new("reelvault-test");

        store
            .put("landscape/a.mp4", "video/mp4", reader_from(b"bytes"))
            .await
            .unwrap();
        assert!(store.exists("landscape/a.mp4").await.unwrap());
        assert_eq!(store.object("landscape/a.mp4").unwrap(), b"bytes");

        let url = store
            .presign("landscape/a.mp4", Duration::from_secs(900))
            .await
            .unwrap();
        assert!(url.contains("landscape/a.mp4"));
        assert!(url.contains("X-Amz-Expires=900"));

        store.delete("landscape/a.mp4").await.unwrap();
        assert!(!store.exists("landscape/a.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn put_is_idempotent_by_key() {
        let store = MemoryAssetStore::new("reelvault-test");

        store
            .put("k.png", "image/png", reader_from(b"one"))
            .await
            .unwrap();
        let first = store.presign("k.png", Duration::from_secs(60)).await.unwrap();

        store
            .put("k.png", "image/png", reader_from(b"one"))
            .await
            .unwrap();
        let second = store.presign("k.png", Duration::from_secs(60)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn delete_of_absent_key_is_not_an_error() {
        let store = MemoryAssetStore::new("reelvault-test");
        store.delete("never-stored.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn presign_of_absent_key_fails() {
        let store = MemoryAssetStore::new("reelvault-test");
        let err = store
            .presign("missing.mp4", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let store = MemoryAssetStore::new("reelvault-test");
        for key in ["../escape.mp4", "/absolute.mp4", ""] {
            let err = store
                .put(key, "video/mp4", reader_from(b"x"))
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)));
        }
    }
}
