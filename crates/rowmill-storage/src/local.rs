use crate::traits::{FetchedObject, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use rowmill_core::StorageBackend;
use std::path::PathBuf;
use tokio::fs;

/// Local filesystem object store. Buckets map to directories under the
/// base path and objects to files beneath them.
#[derive(Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
}

impl LocalObjectStore {
    /// Create a new LocalObjectStore rooted at `base_path`, creating the
    /// directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalObjectStore { base_path })
    }

    /// Convert bucket and key to a filesystem path, rejecting path
    /// traversal sequences that could escape the base directory.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        for part in [bucket, key] {
            if part.contains("..") || part.starts_with('/') {
                return Err(StorageError::InvalidKey(
                    "Object key contains invalid characters".to_string(),
                ));
            }
        }
        Ok(self.base_path.join(bucket).join(key))
    }

    /// Write an object, creating parent directories. Used to seed local
    /// environments and tests; the pipeline itself never writes objects.
    pub async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject> {
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let content_type = mime_guess::from_path(&path)
            .first()
            .map(|m| m.essence_str().to_string());

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local object fetch successful"
        );

        Ok(FetchedObject {
            bytes: Bytes::from(data),
            content_type,
        })
    }

    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        let path = self.object_path(bucket, key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let meta = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        Ok(meta.len())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
