//! Object store abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must
//! implement, plus the error type they share.

use async_trait::async_trait;
use bytes::Bytes;
use rowmill_core::StorageBackend;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Bytes and content-type hint of a fetched object.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Object store abstraction trait
///
/// Backends only have to answer two questions: what is in an object, and
/// how large is it. The size lookup exists so callers can reject oversized
/// payloads before buffering any body bytes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes along with its content-type hint, if the
    /// backend knows one.
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<FetchedObject>;

    /// Size in bytes of an object, without fetching the body.
    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
