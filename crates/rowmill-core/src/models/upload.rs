use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::PARSED_CONFIDENCE_THRESHOLD;
use crate::models::CellValue;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Processing,
    Succeeded,
    Partial,
    Failed,
}

impl UploadStatus {
    /// Succeeded, partial, and failed end the lifecycle. Processing may
    /// still follow a terminal state when an upload is re-extracted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Succeeded | UploadStatus::Partial | UploadStatus::Failed
        )
    }

    /// Forward-only ordering: pending never follows any other state, and a
    /// terminal state is only reached from processing.
    pub fn can_transition_to(&self, next: UploadStatus) -> bool {
        match next {
            UploadStatus::Pending => false,
            UploadStatus::Processing => true,
            UploadStatus::Succeeded | UploadStatus::Partial | UploadStatus::Failed => {
                matches!(self, UploadStatus::Processing)
            }
        }
    }

    /// Terminal status for a finished extraction with the given confidence.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= PARSED_CONFIDENCE_THRESHOLD {
            UploadStatus::Succeeded
        } else if confidence > 0.0 {
            UploadStatus::Partial
        } else {
            UploadStatus::Failed
        }
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Succeeded => write!(f, "succeeded"),
            UploadStatus::Partial => write!(f, "partial"),
            UploadStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for UploadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "processing" => Ok(UploadStatus::Processing),
            "succeeded" => Ok(UploadStatus::Succeeded),
            "partial" => Ok(UploadStatus::Partial),
            "failed" => Ok(UploadStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid upload status: {}", s)),
        }
    }
}

/// One submitted file and its extraction lifecycle.
///
/// Created elsewhere in `pending` when the upload URL is issued; from then
/// on only the pipeline mutates it, and it is never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: String,
    pub workspace_id: String,
    /// Set once a row is produced. Reprocessing reuses it so one upload
    /// never yields two rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
    /// Name-keyed copy of the extracted values, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_fields: Option<BTreeMap<String, CellValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_status_display() {
        assert_eq!(UploadStatus::Pending.to_string(), "pending");
        assert_eq!(UploadStatus::Processing.to_string(), "processing");
        assert_eq!(UploadStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(UploadStatus::Partial.to_string(), "partial");
        assert_eq!(UploadStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_upload_status_from_str() {
        assert_eq!(
            "pending".parse::<UploadStatus>().unwrap(),
            UploadStatus::Pending
        );
        assert_eq!(
            "partial".parse::<UploadStatus>().unwrap(),
            UploadStatus::Partial
        );
        assert!("done".parse::<UploadStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!UploadStatus::Pending.is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
        assert!(UploadStatus::Succeeded.is_terminal());
        assert!(UploadStatus::Partial.is_terminal());
        assert!(UploadStatus::Failed.is_terminal());
    }

    #[test]
    fn test_pending_never_follows_any_state() {
        for status in [
            UploadStatus::Pending,
            UploadStatus::Processing,
            UploadStatus::Succeeded,
            UploadStatus::Partial,
            UploadStatus::Failed,
        ] {
            assert!(!status.can_transition_to(UploadStatus::Pending));
        }
    }

    #[test]
    fn test_processing_reachable_from_everywhere() {
        for status in [
            UploadStatus::Pending,
            UploadStatus::Succeeded,
            UploadStatus::Partial,
            UploadStatus::Failed,
        ] {
            assert!(status.can_transition_to(UploadStatus::Processing));
        }
    }

    #[test]
    fn test_terminal_only_from_processing() {
        assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Succeeded));
        assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Partial));
        assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Failed));
        assert!(!UploadStatus::Pending.can_transition_to(UploadStatus::Succeeded));
        assert!(!UploadStatus::Succeeded.can_transition_to(UploadStatus::Failed));
    }

    #[test]
    fn test_status_from_confidence() {
        assert_eq!(UploadStatus::from_confidence(0.95), UploadStatus::Succeeded);
        assert_eq!(UploadStatus::from_confidence(0.8), UploadStatus::Succeeded);
        assert_eq!(UploadStatus::from_confidence(0.79), UploadStatus::Partial);
        assert_eq!(UploadStatus::from_confidence(0.01), UploadStatus::Partial);
        assert_eq!(UploadStatus::from_confidence(0.0), UploadStatus::Failed);
    }

    #[test]
    fn test_upload_deserializes_with_defaults() {
        let upload: Upload = serde_json::from_value(serde_json::json!({
            "id": "up-1",
            "workspaceId": "ws-1",
            "fileName": "invoice.json",
            "createdAt": "2024-01-05T10:00:00Z",
            "updatedAt": "2024-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(upload.status, UploadStatus::Pending);
        assert!(upload.row_id.is_none());
        assert!(upload.parsed_fields.is_none());
    }
}
