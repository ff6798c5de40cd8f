use crate::traits::{FetchedObject, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use rowmill_core::StorageBackend;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct StoredObject {
    bytes: Bytes,
    content_type: Option<String>,
}

/// In-memory object store for tests and throwaway environments.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object under `(bucket, key)`, replacing any existing one.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: impl Into<Bytes>,
        content_type: Option<&str>,
    ) {
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes: bytes.into(),
                content_type: content_type.map(String::from),
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject> {
        let objects = self.objects.read().await;
        let stored = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        Ok(FetchedObject {
            bytes: stored.bytes.clone(),
            content_type: stored.content_type.clone(),
        })
    }

    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        let objects = self.objects.read().await;
        let stored = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        Ok(stored.bytes.len() as u64)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
