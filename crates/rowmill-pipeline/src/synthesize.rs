//! Row synthesis.

use chrono::Utc;

use rowmill_core::constants::PARSED_CONFIDENCE_THRESHOLD;
use rowmill_core::{new_id, CellValue, Column, Row, RowStatus, Upload};
use rowmill_extract::Extraction;

/// Build the one schema-shaped row a finished extraction produces.
///
/// Every column id appears in `values`; columns the extractor did not match
/// hold an explicit null. Reprocessing reuses `upload.row_id` so one upload
/// never yields two rows, and the upload's share-link attribution carries
/// over to the row.
pub fn synthesize_row(upload: &Upload, extraction: &Extraction, columns: &[Column]) -> Row {
    let row_id = upload.row_id.clone().unwrap_or_else(|| new_id("row"));

    let values = columns
        .iter()
        .map(|column| {
            let value = extraction
                .values
                .get(&column.id)
                .cloned()
                .unwrap_or(CellValue::Null);
            (column.id.clone(), value)
        })
        .collect();

    let status = if extraction.confidence >= PARSED_CONFIDENCE_THRESHOLD {
        RowStatus::Parsed
    } else {
        RowStatus::Submitted
    };

    let now = Utc::now();
    Row {
        id: row_id,
        workspace_id: upload.workspace_id.clone(),
        link_id: upload.link_id.clone(),
        created_by_link_id: upload.link_id.clone(),
        values,
        status,
        created_at: now,
        updated_at: Some(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowmill_core::{ColumnType, UploadStatus};
    use std::collections::BTreeMap;

    fn column(id: &str, name: &str) -> Column {
        Column {
            id: id.to_string(),
            workspace_id: "ws-1".to_string(),
            name: name.to_string(),
            description: String::new(),
            column_type: ColumnType::Text,
            required: false,
            order: 0,
            enum_values: None,
            examples: None,
            hint: None,
        }
    }

    fn upload(row_id: Option<&str>) -> Upload {
        Upload {
            id: "up-1".to_string(),
            workspace_id: "ws-1".to_string(),
            row_id: row_id.map(String::from),
            link_id: Some("link-1".to_string()),
            file_name: "invoice.json".to_string(),
            file_size_bytes: None,
            uploaded_by: None,
            status: UploadStatus::Processing,
            object_key: None,
            parsed_fields: None,
            confidence: None,
            errors: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn extraction(confidence: f64, values: &[(&str, CellValue)]) -> Extraction {
        Extraction {
            values: values
                .iter()
                .map(|(id, v)| (id.to_string(), v.clone()))
                .collect(),
            confidence,
            parsed_fields: None,
        }
    }

    #[test]
    fn test_every_column_present_with_null_fill() {
        let columns = vec![column("c1", "Vendor"), column("c2", "Amount")];
        let extraction = extraction(0.5, &[("c1", CellValue::Text("Acme".to_string()))]);

        let row = synthesize_row(&upload(None), &extraction, &columns);
        assert_eq!(row.values.len(), 2);
        assert_eq!(row.values.get("c1"), Some(&CellValue::Text("Acme".to_string())));
        assert_eq!(row.values.get("c2"), Some(&CellValue::Null));
    }

    #[test]
    fn test_extracted_value_outside_schema_dropped() {
        let columns = vec![column("c1", "Vendor")];
        let mut values = BTreeMap::new();
        values.insert("ghost".to_string(), CellValue::Number(1.0));
        let extraction = Extraction {
            values,
            confidence: 0.9,
            parsed_fields: None,
        };

        let row = synthesize_row(&upload(None), &extraction, &columns);
        assert_eq!(row.values.len(), 1);
        assert!(!row.values.contains_key("ghost"));
    }

    #[test]
    fn test_reuses_upload_row_id() {
        let columns = vec![column("c1", "Vendor")];
        let row = synthesize_row(&upload(Some("row-keep")), &extraction(0.9, &[]), &columns);
        assert_eq!(row.id, "row-keep");
    }

    #[test]
    fn test_mints_row_id_when_none() {
        let columns = vec![column("c1", "Vendor")];
        let row = synthesize_row(&upload(None), &extraction(0.9, &[]), &columns);
        assert!(row.id.starts_with("row-"));
    }

    #[test]
    fn test_status_follows_confidence_threshold() {
        let columns = vec![column("c1", "Vendor")];
        let parsed = synthesize_row(&upload(None), &extraction(0.8, &[]), &columns);
        assert_eq!(parsed.status, RowStatus::Parsed);

        let submitted = synthesize_row(&upload(None), &extraction(0.79, &[]), &columns);
        assert_eq!(submitted.status, RowStatus::Submitted);
    }

    #[test]
    fn test_link_attribution_carries_over() {
        let columns = vec![column("c1", "Vendor")];
        let row = synthesize_row(&upload(None), &extraction(0.9, &[]), &columns);
        assert_eq!(row.link_id.as_deref(), Some("link-1"));
        assert_eq!(row.created_by_link_id.as_deref(), Some("link-1"));
        assert_eq!(row.workspace_id, "ws-1");
        assert!(row.updated_at.is_some());
    }
}
