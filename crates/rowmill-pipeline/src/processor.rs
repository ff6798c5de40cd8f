//! Pipeline orchestrator.
//!
//! One call takes one object-created event end to end: interpret the key,
//! load the upload record, guard the size, fetch and extract, then persist
//! the row and the upload's terminal status. Failures stay scoped to the
//! single upload being processed.

use std::sync::Arc;

use thiserror::Error;

use rowmill_core::constants::{MAX_INLINE_EXTRACT_BYTES, OVERSIZE_ERROR};
use rowmill_core::UploadStatus;
use rowmill_extract::{extract, sniff_format};
use rowmill_records::{RecordError, WorkspaceRepository};
use rowmill_storage::{parse_upload_object_key, ObjectStore, StorageError};

use crate::event::ObjectCreatedEvent;
use crate::synthesize::synthesize_row;

/// Errors that abort processing of a single upload. Everything else a
/// notification can throw at the pipeline is an expected [`ProcessOutcome`].
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Records(#[from] RecordError),
}

pub type ProcessResult<T> = Result<T, ProcessError>;

/// What processing one notification did.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// The key does not name an upload object; nothing was touched.
    UnrecognizedKey,
    /// The key parsed but no upload record exists for it.
    UploadNotFound,
    /// The object exceeds the inline extraction ceiling; the upload was
    /// failed without writing a row.
    Oversize,
    /// Extraction ran to completion and both records were persisted.
    Extracted {
        row_id: String,
        status: UploadStatus,
        confidence: f64,
    },
}

/// Drives one upload through the extraction pipeline.
pub struct UploadProcessor {
    objects: Arc<dyn ObjectStore>,
    records: WorkspaceRepository,
}

impl UploadProcessor {
    pub fn new(objects: Arc<dyn ObjectStore>, records: WorkspaceRepository) -> Self {
        UploadProcessor { objects, records }
    }

    /// Process one object-created notification end to end.
    pub async fn process(&self, event: &ObjectCreatedEvent) -> ProcessResult<ProcessOutcome> {
        let parsed = match parse_upload_object_key(&event.key) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!(key = %event.key, "Unrecognized upload key shape, skipping");
                return Ok(ProcessOutcome::UnrecognizedKey);
            }
        };
        let workspace_id = parsed.workspace_id.as_str();
        let upload_id = parsed.upload_id.as_str();

        let upload = match self.records.get_upload(workspace_id, upload_id).await? {
            Some(upload) => upload,
            None => {
                tracing::warn!(
                    workspace_id = %workspace_id,
                    upload_id = %upload_id,
                    "Upload record not found, skipping"
                );
                return Ok(ProcessOutcome::UploadNotFound);
            }
        };

        self.records
            .mark_upload_processing(workspace_id, upload_id)
            .await?;

        // The guard reads object metadata so oversized bodies are never
        // buffered.
        let size_bytes = self
            .objects
            .content_length(&event.bucket, &event.key)
            .await?;
        if size_bytes > MAX_INLINE_EXTRACT_BYTES {
            tracing::warn!(
                workspace_id = %workspace_id,
                upload_id = %upload_id,
                size_bytes = size_bytes,
                "Upload exceeds inline extraction ceiling"
            );
            self.records
                .mark_upload_failed(workspace_id, upload_id, vec![OVERSIZE_ERROR.to_string()])
                .await?;
            return Ok(ProcessOutcome::Oversize);
        }

        let object = self.objects.fetch(&event.bucket, &event.key).await?;
        let text = String::from_utf8_lossy(&object.bytes).into_owned();

        let columns = self.records.list_columns(workspace_id).await?;

        let format = sniff_format(&text, object.content_type.as_deref());
        let extraction = extract(format, &text, &columns);

        let row = synthesize_row(&upload, &extraction, &columns);
        self.records.put_row(&row).await?;

        let confidence = extraction.confidence;
        let status = UploadStatus::from_confidence(confidence);
        let parsed_fields = extraction.parsed_fields.unwrap_or_default();
        self.records
            .complete_upload(
                workspace_id,
                upload_id,
                status,
                &row.id,
                &parsed_fields,
                confidence,
            )
            .await?;

        tracing::info!(
            workspace_id = %workspace_id,
            upload_id = %upload_id,
            row_id = %row.id,
            format = %format,
            confidence = confidence,
            status = %status,
            "Upload extracted"
        );

        Ok(ProcessOutcome::Extracted {
            row_id: row.id,
            status,
            confidence,
        })
    }
}
