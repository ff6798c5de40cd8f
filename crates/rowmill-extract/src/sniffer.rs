//! Payload format sniffing.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Wire shape of an uploaded payload, as judged from its text and
/// content-type hint. Selects which extractor runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Csv,
    Text,
}

impl Display for PayloadFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PayloadFormat::Json => write!(f, "json"),
            PayloadFormat::Csv => write!(f, "csv"),
            PayloadFormat::Text => write!(f, "text"),
        }
    }
}

/// Classify a payload. This is a priority cascade, not mutually exclusive
/// detection: the branches overlap, and the order decides ambiguous inputs
/// (a CSV whose first character happens to be `{` sniffs as json).
pub fn sniff_format(text: &str, content_type: Option<&str>) -> PayloadFormat {
    let hint = content_type.unwrap_or("");

    if hint.contains("json") || text.trim_start().starts_with('{') {
        return PayloadFormat::Json;
    }
    if hint.contains("csv") || (text.contains(',') && text.contains('\n')) {
        return PayloadFormat::Csv;
    }
    PayloadFormat::Text
}
