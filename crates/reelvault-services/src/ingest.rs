//! Ingestion orchestration.
//!
//! One `IngestService` call takes an upload from a validated request to a
//! persisted object reference: resolve and authorize the target asset,
//! validate the declared content type, buffer the body to a request-scoped
//! scratch directory, probe and classify the geometry (video only), rewrite
//! the container for fast start (video only), store under a fresh key, then
//! persist the new reference and retire the previous object.
//!
//! Replacement ordering is persist-then-delete: the record is updated before
//! the superseded object is removed, so a persistence failure can never
//! leave the record pointing at a deleted object. Uploads to the same asset
//! id are serialized through a per-id async mutex; distinct ids proceed
//! concurrently.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use reelvault_core::models::{MediaAsset, MediaAssetResponse, MediaKind};
use reelvault_core::{AppError, Config, ObjectRef};
use reelvault_processing::aspect::classify_dimensions;
use reelvault_processing::traits::{ContainerRewriter, MediaProber};
use reelvault_processing::{FfmpegRewriter, FfprobeProber};
use reelvault_storage::keys;
use reelvault_storage::traits::{AssetStore, ByteReader};

use crate::repository::AssetRepository;

/// Sequences the ingestion pipeline for uploads and exchanges stored
/// references for signed URLs on reads.
pub struct IngestService {
    repo: Arc<dyn AssetRepository>,
    store: Arc<dyn AssetStore>,
    prober: Arc<dyn MediaProber>,
    rewriter: Arc<dyn ContainerRewriter>,
    config: Config,
    asset_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl IngestService {
    pub fn new(
        repo: Arc<dyn AssetRepository>,
        store: Arc<dyn AssetStore>,
        prober: Arc<dyn MediaProber>,
        rewriter: Arc<dyn ContainerRewriter>,
        config: Config,
    ) -> Self {
        IngestService {
            repo,
            store,
            prober,
            rewriter,
            config,
            asset_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wire the service with the real ffprobe/ffmpeg capabilities named in
    /// the configuration.
    pub fn from_config(
        repo: Arc<dyn AssetRepository>,
        store: Arc<dyn AssetStore>,
        config: Config,
    ) -> Self {
        let prober = Arc::new(FfprobeProber::new(config.ffprobe_path.clone()));
        let rewriter = Arc::new(FfmpegRewriter::new(config.ffmpeg_path.clone()));
        IngestService::new(repo, store, prober, rewriter, config)
    }

    /// Ingest a video upload and return the updated record with a signed
    /// URL for the freshly stored object.
    pub async fn upload_video(
        &self,
        owner_id: Uuid,
        asset_id: Uuid,
        content_type: &str,
        body: ByteReader,
    ) -> Result<MediaAssetResponse, AppError> {
        let lock = self.lock_for(asset_id);
        let _serialized = lock.lock().await;

        tracing::info!(asset_id = %asset_id, owner_id = %owner_id, "Starting video ingestion");

        let mut asset = self.resolve_owned(asset_id, owner_id).await?;
        if asset.kind != MediaKind::Video {
            return Err(AppError::UnsupportedMediaType(format!(
                "asset {} stores {}, not video",
                asset_id, asset.kind
            )));
        }

        let media_type = normalize_media_type(content_type)?;
        if !self
            .config
            .video_allowed_content_types
            .contains(&media_type)
        {
            return Err(AppError::UnsupportedMediaType(format!(
                "{} is not an accepted video type",
                media_type
            )));
        }

        // Scratch directory scoped to this call; Drop removes it and both
        // files on every exit path, including cancellation.
        let scratch = self.scratch_dir()?;
        let upload_path = scratch.path().join("upload.mp4");
        buffer_body(body, &upload_path, self.config.max_video_size_bytes).await?;

        let dims = self.prober.probe_dimensions(&upload_path).await?;
        let classification = classify_dimensions(dims)?;

        let rewritten = self.rewriter.rewrite(&upload_path).await?;
        let reader: ByteReader = Box::pin(File::open(&rewritten).await?);

        let key = keys::video_key(classification, &media_type);
        self.store.put(&key, &media_type, reader).await?;

        let new_ref = ObjectRef::new(self.store.bucket(), key.as_str())?;
        let previous_ref = asset.stored_ref.clone();
        asset.stored_ref = Some(new_ref.encode());
        asset.classification = Some(classification);
        asset.updated_at = chrono::Utc::now();
        self.repo.update(&asset).await?;

        self.delete_previous(asset_id, previous_ref).await?;

        tracing::info!(
            asset_id = %asset_id,
            key = %key,
            classification = %classification,
            width = dims.width,
            height = dims.height,
            "Video ingestion complete"
        );

        self.to_response(&asset).await
    }

    /// Ingest a thumbnail upload: the image path of the state machine,
    /// which skips probing and rewriting.
    pub async fn upload_thumbnail(
        &self,
        owner_id: Uuid,
        asset_id: Uuid,
        content_type: &str,
        body: ByteReader,
    ) -> Result<MediaAssetResponse, AppError> {
        let lock = self.lock_for(asset_id);
        let _serialized = lock.lock().await;

        tracing::info!(asset_id = %asset_id, owner_id = %owner_id, "Starting thumbnail ingestion");

        let mut asset = self.resolve_owned(asset_id, owner_id).await?;
        if asset.kind != MediaKind::Image {
            return Err(AppError::UnsupportedMediaType(format!(
                "asset {} stores {}, not image",
                asset_id, asset.kind
            )));
        }

        let media_type = normalize_media_type(content_type)?;
        if !self
            .config
            .thumbnail_allowed_content_types
            .contains(&media_type)
        {
            return Err(AppError::UnsupportedMediaType(format!(
                "{} is not an accepted thumbnail type",
                media_type
            )));
        }

        let scratch = self.scratch_dir()?;
        let upload_path = scratch.path().join("upload");
        buffer_body(body, &upload_path, self.config.max_thumbnail_size_bytes).await?;

        let reader: ByteReader = Box::pin(File::open(&upload_path).await?);
        let key = keys::thumbnail_key(&media_type);
        self.store.put(&key, &media_type, reader).await?;

        let new_ref = ObjectRef::new(self.store.bucket(), key.as_str())?;
        let previous_ref = asset.stored_ref.clone();
        asset.stored_ref = Some(new_ref.encode());
        asset.updated_at = chrono::Utc::now();
        self.repo.update(&asset).await?;

        self.delete_previous(asset_id, previous_ref).await?;

        tracing::info!(asset_id = %asset_id, key = %key, "Thumbnail ingestion complete");

        self.to_response(&asset).await
    }

    /// Read path: fetch an owned asset and exchange its stored reference
    /// for a signed URL.
    pub async fn get_asset(
        &self,
        owner_id: Uuid,
        asset_id: Uuid,
    ) -> Result<MediaAssetResponse, AppError> {
        let asset = self.resolve_owned(asset_id, owner_id).await?;
        self.to_response(&asset).await
    }

    /// Remove an asset: its stored object first, then its record. The
    /// record survives a failed object delete so the removal can be
    /// retried.
    pub async fn delete_asset(&self, owner_id: Uuid, asset_id: Uuid) -> Result<(), AppError> {
        let lock = self.lock_for(asset_id);
        let _serialized = lock.lock().await;

        let asset = self.resolve_owned(asset_id, owner_id).await?;
        if let Some(encoded) = &asset.stored_ref {
            let stored = ObjectRef::decode(encoded)?;
            self.store.delete(stored.key()).await?;
        }
        self.repo.delete(asset_id).await?;

        tracing::info!(asset_id = %asset_id, "Asset deleted");
        Ok(())
    }

    /// Build the caller-facing view: the record plus a URL presigned from
    /// the current stored reference (None before the first upload).
    pub async fn to_response(&self, asset: &MediaAsset) -> Result<MediaAssetResponse, AppError> {
        let url = match &asset.stored_ref {
            Some(encoded) => {
                let stored = ObjectRef::decode(encoded)?;
                let url = self
                    .store
                    .presign(stored.key(), self.config.presign_expiry())
                    .await?;
                Some(url)
            }
            None => None,
        };
        Ok(MediaAssetResponse::from_asset(asset, url))
    }

    fn lock_for(&self, asset_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.asset_locks
            .lock()
            .unwrap()
            .entry(asset_id)
            .or_default()
            .clone()
    }

    async fn resolve_owned(&self, asset_id: Uuid, owner_id: Uuid) -> Result<MediaAsset, AppError> {
        let asset = self
            .repo
            .get(asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("asset {} not found", asset_id)))?;

        if asset.owner_id != owner_id {
            return Err(AppError::Forbidden(format!(
                "asset {} is not owned by the requesting user",
                asset_id
            )));
        }

        Ok(asset)
    }

    fn scratch_dir(&self) -> Result<TempDir, AppError> {
        TempDir::new_in(&self.config.temp_dir).map_err(AppError::from)
    }

    /// Retire the object a replaced reference pointed at. Runs only after
    /// the new reference is durably persisted; a failure here can only
    /// orphan the superseded object, never the record. A previous reference
    /// that does not decode is logged and skipped: the record no longer
    /// points at it and there is no key to delete.
    async fn delete_previous(
        &self,
        asset_id: Uuid,
        previous_ref: Option<String>,
    ) -> Result<(), AppError> {
        let Some(encoded) = previous_ref else {
            return Ok(());
        };

        match ObjectRef::decode(&encoded) {
            Ok(previous) => {
                self.store.delete(previous.key()).await?;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    asset_id = %asset_id,
                    stored_ref = %encoded,
                    error = %err,
                    "Previous object reference is malformed; skipping delete"
                );
                Ok(())
            }
        }
    }
}

/// Strip MIME parameters and lowercase the declared content type. An empty
/// declaration is unsupported, not merely unknown.
fn normalize_media_type(content_type: &str) -> Result<String, AppError> {
    let media_type = content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();

    if media_type.is_empty() {
        return Err(AppError::UnsupportedMediaType(
            "missing content type".to_string(),
        ));
    }

    Ok(media_type)
}

/// Copy the request body to `dest`, failing once the byte cap is exceeded.
/// The caller's scratch directory owns the destination file.
async fn buffer_body(mut body: ByteReader, dest: &Path, max_bytes: usize) -> Result<u64, AppError> {
    let mut file = File::create(dest).await?;
    let mut total: u64 = 0;
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = body
            .read(&mut buf)
            .await
            .map_err(|e| AppError::Internal(format!("failed to read upload body: {}", e)))?;
        if n == 0 {
            break;
        }

        total += n as u64;
        if total > max_bytes as u64 {
            return Err(AppError::PayloadTooLarge(format!(
                "upload exceeds the {} byte limit",
                max_bytes
            )));
        }

        file.write_all(&buf[..n]).await?;
    }

    file.flush().await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_parameters_are_stripped() {
        assert_eq!(
            normalize_media_type("video/mp4; codecs=\"avc1\"").unwrap(),
            "video/mp4"
        );
        assert_eq!(normalize_media_type("IMAGE/PNG").unwrap(), "image/png");
    }

    #[test]
    fn empty_media_type_is_unsupported() {
        for declared in ["", "   ", ";charset=utf-8"] {
            assert!(matches!(
                normalize_media_type(declared),
                Err(AppError::UnsupportedMediaType(_))
            ));
        }
    }
}
