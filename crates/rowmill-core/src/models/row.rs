use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A single cell scalar. Untagged so cells read and write as plain JSON
/// primitives in persisted documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    #[default]
    Draft,
    Submitted,
    Parsed,
}

impl Display for RowStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RowStatus::Draft => write!(f, "draft"),
            RowStatus::Submitted => write!(f, "submitted"),
            RowStatus::Parsed => write!(f, "parsed"),
        }
    }
}

impl FromStr for RowStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RowStatus::Draft),
            "submitted" => Ok(RowStatus::Submitted),
            "parsed" => Ok(RowStatus::Parsed),
            _ => Err(anyhow::anyhow!("Invalid row status: {}", s)),
        }
    }
}

/// One structured record conforming to the workspace column schema.
///
/// `values` is keyed by column id and covers every column that existed at
/// extraction time; unmatched columns hold an explicit null, never a
/// missing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub workspace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_link_id: Option<String>,
    pub values: BTreeMap<String, CellValue>,
    #[serde(default)]
    pub status: RowStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_serializes_as_primitives() {
        assert_eq!(serde_json::to_value(CellValue::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(CellValue::Bool(true)).unwrap(), serde_json::json!(true));
        assert_eq!(
            serde_json::to_value(CellValue::Number(1284.5)).unwrap(),
            serde_json::json!(1284.5)
        );
        assert_eq!(
            serde_json::to_value(CellValue::Text("Acme".to_string())).unwrap(),
            serde_json::json!("Acme")
        );
    }

    #[test]
    fn test_cell_value_deserializes_from_primitives() {
        assert_eq!(serde_json::from_value::<CellValue>(serde_json::Value::Null).unwrap(), CellValue::Null);
        assert_eq!(
            serde_json::from_value::<CellValue>(serde_json::json!(false)).unwrap(),
            CellValue::Bool(false)
        );
        assert_eq!(
            serde_json::from_value::<CellValue>(serde_json::json!(42)).unwrap(),
            CellValue::Number(42.0)
        );
        assert_eq!(
            serde_json::from_value::<CellValue>(serde_json::json!("x")).unwrap(),
            CellValue::Text("x".to_string())
        );
    }

    #[test]
    fn test_cell_value_accessors() {
        assert!(CellValue::Null.is_null());
        assert_eq!(CellValue::Text("a".to_string()).as_text(), Some("a"));
        assert_eq!(CellValue::Number(2.0).as_number(), Some(2.0));
        assert_eq!(CellValue::Bool(true).as_bool(), Some(true));
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn test_row_status_display() {
        assert_eq!(RowStatus::Draft.to_string(), "draft");
        assert_eq!(RowStatus::Submitted.to_string(), "submitted");
        assert_eq!(RowStatus::Parsed.to_string(), "parsed");
    }

    #[test]
    fn test_row_status_from_str() {
        assert_eq!("draft".parse::<RowStatus>().unwrap(), RowStatus::Draft);
        assert_eq!("parsed".parse::<RowStatus>().unwrap(), RowStatus::Parsed);
        assert!("reviewed".parse::<RowStatus>().is_err());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let mut values = BTreeMap::new();
        values.insert("c1".to_string(), CellValue::Text("Acme".to_string()));
        values.insert("c2".to_string(), CellValue::Null);
        let row = Row {
            id: "row-1".to_string(),
            workspace_id: "ws-1".to_string(),
            link_id: Some("link-1".to_string()),
            created_by_link_id: Some("link-1".to_string()),
            values,
            status: RowStatus::Parsed,
            created_at: Utc::now(),
            updated_at: Some(Utc::now()),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["workspaceId"], "ws-1");
        assert_eq!(value["createdByLinkId"], "link-1");
        assert_eq!(value["status"], "parsed");
        assert_eq!(value["values"]["c1"], "Acme");
        assert_eq!(value["values"]["c2"], serde_json::Value::Null);
    }
}
