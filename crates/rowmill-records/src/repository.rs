use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rowmill_core::{CellValue, Column, Row, Upload, UploadStatus};

use crate::key::{workspace_partition, RecordKey, COLUMN_PREFIX};
use crate::traits::{Document, RecordError, RecordResult, RecordStore};

/// Typed access to the upload, column, and row records of a workspace.
///
/// Record documents do not carry their own key parts; `id` and
/// `workspaceId` are filled in from the key on the way out.
#[derive(Clone)]
pub struct WorkspaceRepository {
    store: Arc<dyn RecordStore>,
}

impl WorkspaceRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        WorkspaceRepository { store }
    }

    /// Fetch an upload record, `None` when it does not exist.
    pub async fn get_upload(
        &self,
        workspace_id: &str,
        upload_id: &str,
    ) -> RecordResult<Option<Upload>> {
        let key = RecordKey::upload(workspace_id, upload_id);
        let mut document = match self.store.get(&key).await? {
            Some(document) => document,
            None => return Ok(None),
        };

        document.insert(
            "id".to_string(),
            serde_json::Value::String(upload_id.to_string()),
        );
        document.insert(
            "workspaceId".to_string(),
            serde_json::Value::String(workspace_id.to_string()),
        );

        let upload = serde_json::from_value(serde_json::Value::Object(document)).map_err(|e| {
            RecordError::MalformedRecord(format!("{}/{}", key.partition, key.sort), e.to_string())
        })?;
        Ok(Some(upload))
    }

    /// All columns of a workspace, sorted by their declared order.
    pub async fn list_columns(&self, workspace_id: &str) -> RecordResult<Vec<Column>> {
        let partition = workspace_partition(workspace_id);
        let documents = self.store.query_prefix(&partition, COLUMN_PREFIX).await?;

        let mut columns = Vec::with_capacity(documents.len());
        for mut document in documents {
            let column_id = document
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            document.insert(
                "workspaceId".to_string(),
                serde_json::Value::String(workspace_id.to_string()),
            );
            let column = serde_json::from_value(serde_json::Value::Object(document)).map_err(
                |e| {
                    RecordError::MalformedRecord(
                        format!("{}/{}{}", partition, COLUMN_PREFIX, column_id),
                        e.to_string(),
                    )
                },
            )?;
            columns.push(column);
        }

        columns.sort_by_key(|c: &Column| c.order);
        Ok(columns)
    }

    /// Write a row record, replacing any previous version.
    pub async fn put_row(&self, row: &Row) -> RecordResult<()> {
        let key = RecordKey::row(&row.workspace_id, &row.id);
        let document = match serde_json::to_value(row)? {
            serde_json::Value::Object(document) => document,
            _ => {
                return Err(RecordError::BackendError(
                    "Row did not serialize to an object".to_string(),
                ))
            }
        };
        self.store.put(&key, document).await
    }

    /// Move an upload into `processing` before extraction starts.
    pub async fn mark_upload_processing(
        &self,
        workspace_id: &str,
        upload_id: &str,
    ) -> RecordResult<()> {
        let mut fields = Document::new();
        fields.insert(
            "status".to_string(),
            serde_json::to_value(UploadStatus::Processing)?,
        );
        fields.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
        self.update_upload(workspace_id, upload_id, fields).await
    }

    /// Terminal failure without a row, recording the reasons.
    pub async fn mark_upload_failed(
        &self,
        workspace_id: &str,
        upload_id: &str,
        errors: Vec<String>,
    ) -> RecordResult<()> {
        let mut fields = Document::new();
        fields.insert(
            "status".to_string(),
            serde_json::to_value(UploadStatus::Failed)?,
        );
        fields.insert("errors".to_string(), serde_json::to_value(errors)?);
        fields.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
        self.update_upload(workspace_id, upload_id, fields).await
    }

    /// Record the outcome of a finished extraction.
    pub async fn complete_upload(
        &self,
        workspace_id: &str,
        upload_id: &str,
        status: UploadStatus,
        row_id: &str,
        parsed_fields: &BTreeMap<String, CellValue>,
        confidence: f64,
    ) -> RecordResult<()> {
        let mut fields = Document::new();
        fields.insert("status".to_string(), serde_json::to_value(status)?);
        fields.insert(
            "rowId".to_string(),
            serde_json::Value::String(row_id.to_string()),
        );
        fields.insert(
            "parsedFields".to_string(),
            serde_json::to_value(parsed_fields)?,
        );
        fields.insert("confidence".to_string(), serde_json::to_value(confidence)?);
        fields.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
        self.update_upload(workspace_id, upload_id, fields).await
    }

    async fn update_upload(
        &self,
        workspace_id: &str,
        upload_id: &str,
        fields: Document,
    ) -> RecordResult<()> {
        let key = RecordKey::upload(workspace_id, upload_id);
        self.store.update(&key, fields).await
    }
}
