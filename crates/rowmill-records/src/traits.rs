use async_trait::async_trait;
use thiserror::Error;

use crate::key::RecordKey;

/// Schemaless record body, one attribute per field.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record backend error: {0}")]
    BackendError(String),

    #[error("Malformed record at {0}: {1}")]
    MalformedRecord(String, String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Key-value record store with prefix queries over sort keys.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one record, `None` when absent.
    async fn get(&self, key: &RecordKey) -> RecordResult<Option<Document>>;

    /// Write a full record, replacing any existing one.
    async fn put(&self, key: &RecordKey, document: Document) -> RecordResult<()>;

    /// Merge `fields` into an existing record, creating it when absent.
    /// Attributes not named in `fields` are left untouched.
    async fn update(&self, key: &RecordKey, fields: Document) -> RecordResult<()>;

    /// All records whose sort key starts with `sort_prefix`, in sort key order.
    async fn query_prefix(
        &self,
        partition: &str,
        sort_prefix: &str,
    ) -> RecordResult<Vec<Document>>;
}
