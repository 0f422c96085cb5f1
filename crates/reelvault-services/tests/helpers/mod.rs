//! Shared fixtures for ingestion tests: scripted tool fakes, a failing
//! repository wrapper, and an environment wiring the service to the
//! in-memory backends.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use reelvault_core::models::{MediaAsset, MediaKind};
use reelvault_core::{AppError, Config};
use reelvault_processing::error::ProcessingError;
use reelvault_processing::traits::{ContainerRewriter, Dimensions, MediaProber};
use reelvault_services::{AssetRepository, IngestService, MemoryAssetRepository};
use reelvault_storage::memory::MemoryAssetStore;
use reelvault_storage::traits::{AssetStore, ByteReader};

/// Prober that returns fixed dimensions without spawning anything.
pub struct FixedProber {
    pub dims: Dimensions,
}

#[async_trait]
impl MediaProber for FixedProber {
    async fn probe_dimensions(&self, _path: &Path) -> Result<Dimensions, ProcessingError> {
        Ok(self.dims)
    }
}

/// Prober that always fails, as ffprobe does on a corrupt file.
pub struct FailingProber;

#[async_trait]
impl MediaProber for FailingProber {
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProcessingError> {
        Err(ProcessingError::ProbeFailed {
            path: path.to_path_buf(),
            reason: "moov atom not found".to_string(),
        })
    }
}

/// Rewriter that copies the input to the derived sibling output path.
pub struct CopyRewriter;

#[async_trait]
impl ContainerRewriter for CopyRewriter {
    async fn rewrite(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        let mut name = input.as_os_str().to_os_string();
        name.push(".faststart.mp4");
        let output = PathBuf::from(name);
        tokio::fs::copy(input, &output).await?;
        Ok(output)
    }
}

/// Repository wrapper whose updates can be switched to fail, for
/// exercising the persist-then-delete ordering.
pub struct FailingRepository {
    inner: MemoryAssetRepository,
    fail_updates: AtomicBool,
}

impl FailingRepository {
    pub fn new(inner: MemoryAssetRepository) -> Self {
        FailingRepository {
            inner,
            fail_updates: AtomicBool::new(false),
        }
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetRepository for FailingRepository {
    async fn get(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError> {
        self.inner.get(id).await
    }

    async fn update(&self, asset: &MediaAsset) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Persist("record store unavailable".to_string()));
        }
        self.inner.update(asset).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.inner.delete(id).await
    }
}

/// Test environment: in-memory store and repository plus a dedicated temp
/// root so cleanup assertions can enumerate leftovers.
pub struct TestEnv {
    pub store: Arc<MemoryAssetStore>,
    pub repo: MemoryAssetRepository,
    pub temp_root: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_root = TempDir::new().expect("temp root");
        let config = Config {
            temp_dir: temp_root.path().to_path_buf(),
            ..Config::default()
        };
        TestEnv {
            store: Arc::new(MemoryAssetStore::new("reelvault-test")),
            repo: MemoryAssetRepository::new(),
            temp_root,
            config,
        }
    }

    /// Service wired with a 1920x1080 prober.
    pub fn service(&self) -> IngestService {
        self.service_with_dims(Dimensions {
            width: 1920,
            height: 1080,
        })
    }

    pub fn service_with_dims(&self, dims: Dimensions) -> IngestService {
        self.service_with_prober(Arc::new(FixedProber { dims }))
    }

    pub fn service_with_prober(&self, prober: Arc<dyn MediaProber>) -> IngestService {
        self.service_with(prober, Arc::new(self.repo.clone()))
    }

    pub fn service_with(
        &self,
        prober: Arc<dyn MediaProber>,
        repo: Arc<dyn AssetRepository>,
    ) -> IngestService {
        let store: Arc<dyn AssetStore> = self.store.clone();
        IngestService::new(repo, store, prober, Arc::new(CopyRewriter), self.config.clone())
    }

    /// Seed a record, as the (external) video-creation flow would.
    pub fn seed(&self, owner_id: Uuid, kind: MediaKind) -> Uuid {
        let asset = MediaAsset::new(Uuid::new_v4(), owner_id, kind);
        let id = asset.id;
        self.repo.insert(asset);
        id
    }

    pub fn temp_root_is_empty(&self) -> bool {
        std::fs::read_dir(self.temp_root.path())
            .expect("read temp root")
            .next()
            .is_none()
    }
}

/// Request body from in-memory bytes.
pub fn body(data: &[u8]) -> ByteReader {
    Box::pin(std::io::Cursor::new(data.to_vec()))
}
