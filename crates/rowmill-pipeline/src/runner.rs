//! Worker runner: bounded-concurrency dispatch of storage notifications.
//!
//! Shutdown: [`ExtractionRunner::shutdown`] signals the loop to stop; it
//! does not wait for in-flight extractions. For graceful shutdown, give
//! running extractions time to finish before process exit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;

use crate::event::ObjectCreatedEvent;
use crate::processor::UploadProcessor;

/// Where the runner gets its notifications from.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Next batch of events. An empty batch is the normal outcome of a poll
    /// timeout; an error is backed off and retried.
    async fn next_batch(&self) -> anyhow::Result<Vec<ObjectCreatedEvent>>;
}

#[derive(Clone)]
pub struct RunnerConfig {
    /// Maximum number of uploads processed concurrently.
    pub max_workers: usize,
    /// Delay in seconds before polling again after a source error.
    pub poll_error_backoff_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            poll_error_backoff_secs: 5,
        }
    }
}

/// Event loop feeding a semaphore-capped pool of extraction tasks.
pub struct ExtractionRunner {
    shutdown_tx: mpsc::Sender<()>,
}

impl ExtractionRunner {
    /// Spawn the run loop on the current runtime.
    pub fn start(
        processor: Arc<UploadProcessor>,
        source: Arc<dyn EventSource>,
        config: RunnerConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            Self::run_loop(processor, source, config, shutdown_rx).await;
        });

        Self { shutdown_tx }
    }

    async fn run_loop(
        processor: Arc<UploadProcessor>,
        source: Arc<dyn EventSource>,
        config: RunnerConfig,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(
            max_workers = config.max_workers,
            "Extraction runner started"
        );

        let semaphore = Arc::new(Semaphore::new(config.max_workers.max(1)));
        let backoff = Duration::from_secs(config.poll_error_backoff_secs);

        loop {
            let batch = tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Extraction runner shutting down");
                    break;
                }
                batch = source.next_batch() => batch,
            };

            match batch {
                Ok(events) => {
                    for event in events {
                        Self::dispatch(&processor, &semaphore, event).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Event source poll failed");
                    sleep(backoff).await;
                }
            }
        }

        tracing::info!("Extraction runner stopped");
    }

    /// Hand one event to a worker task. Waits for a permit rather than
    /// dropping work: every event received from the source gets processed.
    async fn dispatch(
        processor: &Arc<UploadProcessor>,
        semaphore: &Arc<Semaphore>,
        event: ObjectCreatedEvent,
    ) {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is never closed while the runner is alive.
            Err(_) => return,
        };

        let processor = processor.clone();
        tokio::spawn(async move {
            let _permit = permit;
            match processor.process(&event).await {
                Ok(outcome) => {
                    tracing::debug!(key = %event.key, outcome = ?outcome, "Notification processed");
                }
                Err(e) => {
                    tracing::error!(key = %event.key, error = %e, "Extraction failed");
                }
            }
        });
    }

    /// Signals the run loop to stop taking new events and exit.
    ///
    /// Returns immediately after sending the signal; in-flight extractions
    /// keep running until they finish.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating extraction runner shutdown");
        let _ = self.shutdown_tx.send(()).await;
    }
}
