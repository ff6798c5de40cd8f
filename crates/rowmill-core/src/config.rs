//! Configuration module
//!
//! Environment-driven configuration for the extraction worker and the
//! storage and record-store backends it wires together.

use std::env;

use crate::storage_types::StorageBackend;

/// Worker configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Record store table holding workspaces, columns, uploads, and rows.
    pub data_table: String,
    /// Bucket (or local root, for the local backend) holding uploaded files.
    pub upload_bucket: String,
    /// Queue delivering storage-created notifications.
    pub extract_queue_url: Option<String>,
    pub aws_region: Option<String>,
    pub storage_backend: Option<StorageBackend>,
    pub local_storage_path: Option<String>,
    /// Maximum number of uploads processed concurrently.
    pub max_workers: usize,
    /// Long-poll wait when receiving notifications, in seconds.
    pub poll_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_WORKERS: usize = 4;
        const POLL_INTERVAL_SECS: u64 = 20;

        Ok(Self {
            data_table: env::var("DATA_TABLE")
                .map_err(|_| anyhow::anyhow!("DATA_TABLE must be set"))?,
            upload_bucket: env::var("UPLOAD_BUCKET")
                .map_err(|_| anyhow::anyhow!("UPLOAD_BUCKET must be set"))?,
            extract_queue_url: env::var("EXTRACT_QUEUE_URL").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|s| s.parse().ok()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            max_workers: env::var("MAX_WORKERS")
                .unwrap_or_else(|_| MAX_WORKERS.to_string())
                .parse()
                .unwrap_or(MAX_WORKERS),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| POLL_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(POLL_INTERVAL_SECS),
        })
    }
}
