//! Format-specific extractors.
//!
//! Each extractor maps one payload format onto the workspace column schema
//! and reports how much of the schema it covered. Extractors never fail:
//! unparseable JSON and undersized CSV degrade to the plain-text extractor,
//! and the plain-text extractor always produces a result.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use rowmill_core::constants::{CSV_CONFIDENCE_CAP, JSON_CONFIDENCE_CAP, TEXT_CONFIDENCE_CAP};
use rowmill_core::{CellValue, Column};

use crate::coerce::coerce_value;
use crate::normalize::normalize_name;
use crate::sniffer::PayloadFormat;

/// Result of running one extractor over an upload's text.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Matched values keyed by column id. Only matched columns appear here;
    /// row synthesis fills the rest with explicit nulls.
    pub values: BTreeMap<String, CellValue>,
    /// Share of schema columns matched, capped per extractor.
    pub confidence: f64,
    /// Matched values re-keyed by column name, kept on the upload record for
    /// display. The plain-text extractor does not produce these.
    pub parsed_fields: Option<BTreeMap<String, CellValue>>,
}

/// Run the extractor for a sniffed format.
pub fn extract(format: PayloadFormat, text: &str, columns: &[Column]) -> Extraction {
    match format {
        PayloadFormat::Json => extract_from_json(text, columns),
        PayloadFormat::Csv => extract_from_csv(text, columns),
        PayloadFormat::Text => extract_from_text(text, columns),
    }
}

/// Match columns against a JSON object payload, looking up each column by id
/// first and then by display name.
pub fn extract_from_json(text: &str, columns: &[Column]) -> Extraction {
    let payload: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return extract_from_text(text, columns),
    };

    let mut values = BTreeMap::new();
    let mut matched = 0usize;
    for column in columns {
        // An explicit null under the id key falls through to the name key.
        let raw = match payload.get(&column.id).filter(|v| !v.is_null()) {
            Some(v) => Some(v),
            None => payload.get(&column.name),
        };
        if let Some(raw) = raw {
            values.insert(column.id.clone(), coerce_value(column, raw));
            matched += 1;
        }
    }

    let confidence = capped_confidence(JSON_CONFIDENCE_CAP, matched, columns.len());
    let parsed_fields = Some(name_keyed(&values, columns));
    Extraction {
        values,
        confidence,
        parsed_fields,
    }
}

/// Match columns against the header row of a CSV payload, reading values
/// from the first data line only.
pub fn extract_from_csv(text: &str, columns: &[Column]) -> Extraction {
    let record = match parse_csv_first_record(text) {
        Some(record) => record,
        None => return extract_from_text(text, columns),
    };

    let mut values = BTreeMap::new();
    let mut matched = 0usize;
    for (i, header) in record.headers.iter().enumerate() {
        let normalized = normalize_name(header);
        let column = columns
            .iter()
            .find(|c| normalize_name(&c.name) == normalized)
            .or_else(|| columns.iter().find(|c| normalize_name(&c.id) == normalized));
        let column = match column {
            Some(column) => column,
            None => continue,
        };
        // A matched header with no value token on the data line still counts
        // as matched; the cell becomes null.
        let raw = match record.values.get(i) {
            Some(token) => Value::String(token.clone()),
            None => Value::Null,
        };
        values.insert(column.id.clone(), coerce_value(column, &raw));
        matched += 1;
    }

    let confidence = capped_confidence(CSV_CONFIDENCE_CAP, matched, columns.len());
    let parsed_fields = Some(name_keyed(&values, columns));
    Extraction {
        values,
        confidence,
        parsed_fields,
    }
}

/// Scan freeform text for `Name: value` or `Name = value` lines, one probe
/// per column.
pub fn extract_from_text(text: &str, columns: &[Column]) -> Extraction {
    let mut values = BTreeMap::new();
    let mut matched = 0usize;
    for column in columns {
        let pattern = format!(
            r"(?im)^\s*{}\s*[:=]\s*(.+)\s*$",
            regex::escape(&column.name)
        );
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(_) => continue,
        };
        if let Some(capture) = regex.captures(text).and_then(|c| c.get(1)) {
            let raw = Value::String(capture.as_str().trim().to_string());
            values.insert(column.id.clone(), coerce_value(column, &raw));
            matched += 1;
        }
    }

    let confidence = capped_confidence(TEXT_CONFIDENCE_CAP, matched, columns.len());
    Extraction {
        values,
        confidence,
        parsed_fields: None,
    }
}

struct CsvFirstRecord {
    headers: Vec<String>,
    values: Vec<String>,
}

/// First data record of a naive CSV: the header line plus the first value
/// line, blank lines skipped. Commas inside quoted fields are not handled.
fn parse_csv_first_record(text: &str) -> Option<CsvFirstRecord> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let headers = split_csv_line(lines.next()?);
    let values = split_csv_line(lines.next()?);
    Some(CsvFirstRecord { headers, values })
}

fn split_csv_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(|token| strip_quotes(token.trim()).to_string())
        .collect()
}

/// Strip one layer of leading and trailing double quotes, each side
/// independently.
fn strip_quotes(token: &str) -> &str {
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token)
}

fn capped_confidence(cap: f64, matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matched as f64 / total as f64).min(cap)
}

/// Re-key an id-keyed value map by column display name.
fn name_keyed(
    values: &BTreeMap<String, CellValue>,
    columns: &[Column],
) -> BTreeMap<String, CellValue> {
    values
        .iter()
        .map(|(id, value)| {
            let name = columns
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.clone());
            (name, value.clone())
        })
        .collect()
}
