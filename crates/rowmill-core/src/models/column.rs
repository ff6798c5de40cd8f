use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Declared type of a workspace column. Each variant has its own coercion
/// rule during extraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Enum,
    Attachment,
    Email,
    Url,
    Money,
    Json,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Enum => write!(f, "enum"),
            ColumnType::Attachment => write!(f, "attachment"),
            ColumnType::Email => write!(f, "email"),
            ColumnType::Url => write!(f, "url"),
            ColumnType::Money => write!(f, "money"),
            ColumnType::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "enum" => Ok(ColumnType::Enum),
            "attachment" => Ok(ColumnType::Attachment),
            "email" => Ok(ColumnType::Email),
            "url" => Ok(ColumnType::Url),
            "money" => Ok(ColumnType::Money),
            "json" => Ok(ColumnType::Json),
            _ => Err(anyhow::anyhow!("Invalid column type: {}", s)),
        }
    }
}

/// Schema field definition, authored by the workspace owner before any
/// upload is processed. The pipeline reads columns and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub required: bool,
    /// Presentation order; also the priority order for header matching.
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
