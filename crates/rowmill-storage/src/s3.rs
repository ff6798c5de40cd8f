//! S3-backed object store.

use crate::traits::{FetchedObject, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use rowmill_core::StorageBackend;

/// Object store backed by S3. Holds one client; the bucket is chosen per
/// call since it arrives with each storage notification.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    /// Create a client from the ambient AWS environment, optionally pinned
    /// to a region.
    pub async fn new(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;

        S3ObjectStore {
            client: S3Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject> {
        let start = std::time::Instant::now();

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::DownloadFailed(service_err.to_string())
                }
            })?;

        let content_type = resp.content_type().map(String::from);
        let bytes = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 object fetch successful"
        );

        Ok(FetchedObject {
            bytes,
            content_type,
        })
    }

    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::BackendError(service_err.to_string())
                }
            })?;

        resp.content_length()
            .and_then(|len| u64::try_from(len).ok())
            .ok_or_else(|| StorageError::BackendError(format!("No content length for {}", key)))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
