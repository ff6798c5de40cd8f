//! Shared upload object key layout.
//!
//! Key format: `workspaces/{workspaceId}/uploads/{uploadId}/{fileName}`.
//! Both the builder and the parser live here so every producer and consumer
//! uses the same shape.

/// Identifiers recovered from an upload object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUploadKey {
    pub workspace_id: String,
    pub upload_id: String,
    pub file_name: String,
}

/// Build the object key for an upload. Slashes in the file name are
/// replaced with underscores so they cannot introduce path segments.
pub fn upload_object_key(workspace_id: &str, upload_id: &str, file_name: &str) -> String {
    let safe_file_name = file_name.replace('/', "_");
    format!(
        "workspaces/{}/uploads/{}/{}",
        workspace_id, upload_id, safe_file_name
    )
}

/// Parse an object key of the upload layout.
///
/// Returns `None` for any other shape. Storage notifications may reference
/// unrelated objects, so an unrecognized key is expected input, not an
/// error. File names containing `/` keep everything past the fourth
/// segment.
pub fn parse_upload_object_key(key: &str) -> Option<ParsedUploadKey> {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() < 5 || parts[0] != "workspaces" || parts[2] != "uploads" {
        return None;
    }

    let workspace_id = parts[1];
    let upload_id = parts[3];
    if workspace_id.is_empty() || upload_id.is_empty() {
        return None;
    }

    let file_name = parts[4..].join("/");
    if file_name.is_empty() {
        return None;
    }

    Some(ParsedUploadKey {
        workspace_id: workspace_id.to_string(),
        upload_id: upload_id.to_string(),
        file_name,
    })
}
