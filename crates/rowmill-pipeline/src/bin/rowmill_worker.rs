//! Extraction worker binary.
//!
//! Wires config, storage, records, and the SQS event source into the
//! extraction runner, then waits for ctrl-c.

use std::sync::Arc;

use anyhow::{Context, Result};

use rowmill_core::Config;
use rowmill_pipeline::{ExtractionRunner, RunnerConfig, SqsEventSource, UploadProcessor};
use rowmill_records::{DynamoRecordStore, WorkspaceRepository};
use rowmill_storage::create_object_store;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let queue_url = config
        .extract_queue_url
        .clone()
        .context("EXTRACT_QUEUE_URL must be set")?;

    let objects = create_object_store(&config).await?;
    let store = Arc::new(
        DynamoRecordStore::new(config.data_table.clone(), config.aws_region.clone()).await,
    );
    let records = WorkspaceRepository::new(store);
    let processor = Arc::new(UploadProcessor::new(objects, records));

    let source = Arc::new(
        SqsEventSource::new(queue_url, config.aws_region.clone(), config.poll_interval_secs).await,
    );

    let runner = ExtractionRunner::start(
        processor,
        source,
        RunnerConfig {
            max_workers: config.max_workers,
            ..RunnerConfig::default()
        },
    );

    tracing::info!(
        table = %config.data_table,
        bucket = %config.upload_bucket,
        "Extraction worker running, press ctrl-c to stop"
    );

    tokio::signal::ctrl_c().await?;
    runner.shutdown().await;

    Ok(())
}
