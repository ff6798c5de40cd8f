//! Rowmill Pipeline Library
//!
//! Ties the other crates together: decodes storage notifications into
//! object-created events, drives each referenced upload through extraction,
//! and hosts the bounded worker pool that feeds the processor. Each event
//! is processed independently; one bad upload never stops the others.

pub mod event;
pub mod processor;
pub mod runner;
#[cfg(feature = "aws")]
pub mod sqs;
pub mod synthesize;

// Re-export commonly used types
pub use event::{decode_object_key, decode_storage_event, ObjectCreatedEvent};
pub use processor::{ProcessError, ProcessOutcome, ProcessResult, UploadProcessor};
pub use runner::{EventSource, ExtractionRunner, RunnerConfig};
#[cfg(feature = "aws")]
pub use sqs::SqsEventSource;
pub use synthesize::synthesize_row;
