//! Value coercion.
//!
//! One rule per declared column type, applied to the raw value an extractor
//! matched. Coercion is total: anything that cannot be represented under the
//! column's type becomes null (or, for money, the original text) rather than
//! an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use rowmill_core::{CellValue, Column, ColumnType};

use crate::normalize::normalize_name;

/// Date shapes accepted for `date` columns, tried in order after RFC 3339.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Coerce one raw extracted value into the scalar shape its column declares.
///
/// Null and whitespace-only string inputs coerce to null for every type.
pub fn coerce_value(column: &Column, raw: &Value) -> CellValue {
    if raw.is_null() {
        return CellValue::Null;
    }
    if let Some(s) = raw.as_str() {
        if s.trim().is_empty() {
            return CellValue::Null;
        }
    }

    match column.column_type {
        ColumnType::Number => coerce_number(raw),
        ColumnType::Date => coerce_date(raw),
        ColumnType::Money => coerce_money(raw),
        ColumnType::Email | ColumnType::Url | ColumnType::Text => {
            CellValue::Text(raw_to_string(raw).trim().to_string())
        }
        ColumnType::Enum => coerce_enum(column, raw),
        ColumnType::Json => coerce_json(raw),
        // Attachments are not representable as scalar cell values yet.
        ColumnType::Attachment => CellValue::Null,
    }
}

/// Render a raw value the way it would read in a cell. Structured values
/// serialize to JSON text.
fn raw_to_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn coerce_number(raw: &Value) -> CellValue {
    if let Some(n) = raw.as_f64() {
        return CellValue::Number(n);
    }
    let parsed = match raw.as_str() {
        // Tolerate thousands separators.
        Some(s) => s.replace(',', "").trim().parse::<f64>(),
        None => return CellValue::Null,
    };
    match parsed {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Null,
    }
}

fn coerce_date(raw: &Value) -> CellValue {
    let s = match raw.as_str() {
        Some(s) => s,
        None => return CellValue::Null,
    };
    match parse_calendar_date(s) {
        Some(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
        None => CellValue::Null,
    }
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

fn coerce_money(raw: &Value) -> CellValue {
    let s = raw_to_string(raw).trim().to_string();
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        // Unparseable amounts keep their text so nothing is lost.
        _ => CellValue::Text(s),
    }
}

fn coerce_enum(column: &Column, raw: &Value) -> CellValue {
    let s = raw_to_string(raw).trim().to_string();
    let declared = match &column.enum_values {
        Some(values) if !values.is_empty() => values,
        _ => return CellValue::Text(s),
    };

    let normalized = normalize_name(&s);
    match declared.iter().find(|v| normalize_name(v) == normalized) {
        Some(canonical) => CellValue::Text(canonical.clone()),
        // No declared value matched; keep the raw text instead of erroring.
        None => CellValue::Text(s),
    }
}

fn coerce_json(raw: &Value) -> CellValue {
    match raw {
        // Strings pass through untouched, JSON-ish or not.
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Object(_) | Value::Array(_) => CellValue::Text(raw.to_string()),
        other => CellValue::Text(raw_to_string(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(column_type: ColumnType) -> Column {
        Column {
            id: "c1".to_string(),
            workspace_id: "ws-1".to_string(),
            name: "Field".to_string(),
            description: "A field".to_string(),
            column_type,
            required: false,
            order: 0,
            enum_values: None,
            examples: None,
            hint: None,
        }
    }

    fn enum_column(values: &[&str]) -> Column {
        Column {
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            ..column(ColumnType::Enum)
        }
    }

    #[test]
    fn test_null_and_blank_coerce_to_null_for_every_type() {
        for column_type in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Date,
            ColumnType::Enum,
            ColumnType::Attachment,
            ColumnType::Email,
            ColumnType::Url,
            ColumnType::Money,
            ColumnType::Json,
        ] {
            let col = column(column_type);
            assert_eq!(coerce_value(&col, &Value::Null), CellValue::Null);
            assert_eq!(coerce_value(&col, &json!("")), CellValue::Null);
            assert_eq!(coerce_value(&col, &json!("   ")), CellValue::Null);
        }
    }

    #[test]
    fn test_number_strips_thousands_separators() {
        let col = column(ColumnType::Number);
        assert_eq!(
            coerce_value(&col, &json!("1,284.50")),
            CellValue::Number(1284.5)
        );
        assert_eq!(coerce_value(&col, &json!(" 42 ")), CellValue::Number(42.0));
        assert_eq!(coerce_value(&col, &json!(-3.5)), CellValue::Number(-3.5));
    }

    #[test]
    fn test_number_unparseable_is_null() {
        let col = column(ColumnType::Number);
        assert_eq!(coerce_value(&col, &json!("twelve")), CellValue::Null);
        assert_eq!(coerce_value(&col, &json!("inf")), CellValue::Null);
        assert_eq!(coerce_value(&col, &json!(true)), CellValue::Null);
        assert_eq!(coerce_value(&col, &json!({"a": 1})), CellValue::Null);
    }

    #[test]
    fn test_date_emits_iso() {
        let col = column(ColumnType::Date);
        assert_eq!(
            coerce_value(&col, &json!("2024-01-05")),
            CellValue::Text("2024-01-05".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!("01/05/2024")),
            CellValue::Text("2024-01-05".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!("January 5, 2024")),
            CellValue::Text("2024-01-05".to_string())
        );
    }

    #[test]
    fn test_date_timestamp_collapses_to_utc_day() {
        let col = column(ColumnType::Date);
        assert_eq!(
            coerce_value(&col, &json!("2024-01-05T23:30:00-05:00")),
            CellValue::Text("2024-01-06".to_string())
        );
    }

    #[test]
    fn test_date_unparseable_is_null() {
        let col = column(ColumnType::Date);
        assert_eq!(coerce_value(&col, &json!("soon")), CellValue::Null);
        assert_eq!(coerce_value(&col, &json!(1704412800)), CellValue::Null);
    }

    #[test]
    fn test_money_parses_currency_text() {
        let col = column(ColumnType::Money);
        assert_eq!(
            coerce_value(&col, &json!("$1,284.50")),
            CellValue::Number(1284.5)
        );
        assert_eq!(
            coerce_value(&col, &json!("EUR -42.10")),
            CellValue::Number(-42.1)
        );
        assert_eq!(coerce_value(&col, &json!(99.9)), CellValue::Number(99.9));
    }

    #[test]
    fn test_money_falls_back_to_trimmed_text() {
        let col = column(ColumnType::Money);
        assert_eq!(
            coerce_value(&col, &json!(" about forty ")),
            CellValue::Text("about forty".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!("1.2.3 USD")),
            CellValue::Text("1.2.3 USD".to_string())
        );
    }

    #[test]
    fn test_text_email_url_trim() {
        for column_type in [ColumnType::Text, ColumnType::Email, ColumnType::Url] {
            let col = column(column_type);
            assert_eq!(
                coerce_value(&col, &json!("  hello@acme.co  ")),
                CellValue::Text("hello@acme.co".to_string())
            );
        }
    }

    #[test]
    fn test_enum_matches_canonical_value() {
        let col = enum_column(&["EUR", "USD"]);
        assert_eq!(
            coerce_value(&col, &json!(" eur ")),
            CellValue::Text("EUR".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!("usd")),
            CellValue::Text("USD".to_string())
        );
    }

    #[test]
    fn test_enum_no_match_keeps_raw_text() {
        let col = enum_column(&["EUR", "USD"]);
        assert_eq!(
            coerce_value(&col, &json!(" GBP ")),
            CellValue::Text("GBP".to_string())
        );
    }

    #[test]
    fn test_enum_without_declared_values_passes_through() {
        let col = column(ColumnType::Enum);
        assert_eq!(
            coerce_value(&col, &json!(" anything ")),
            CellValue::Text("anything".to_string())
        );
    }

    #[test]
    fn test_enum_normalizes_internal_whitespace() {
        let col = enum_column(&["North  America"]);
        assert_eq!(
            coerce_value(&col, &json!("north america")),
            CellValue::Text("North  America".to_string())
        );
    }

    #[test]
    fn test_json_serializes_structured_values() {
        let col = column(ColumnType::Json);
        assert_eq!(
            coerce_value(&col, &json!({"a": 1})),
            CellValue::Text("{\"a\":1}".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!([1, 2])),
            CellValue::Text("[1,2]".to_string())
        );
    }

    #[test]
    fn test_json_string_passes_through_untrimmed() {
        let col = column(ColumnType::Json);
        assert_eq!(
            coerce_value(&col, &json!(" {\"a\": 1} ")),
            CellValue::Text(" {\"a\": 1} ".to_string())
        );
        assert_eq!(
            coerce_value(&col, &json!("not json")),
            CellValue::Text("not json".to_string())
        );
    }

    #[test]
    fn test_attachment_always_null() {
        let col = column(ColumnType::Attachment);
        assert_eq!(coerce_value(&col, &json!("file.pdf")), CellValue::Null);
        assert_eq!(coerce_value(&col, &json!(42)), CellValue::Null);
    }
}
