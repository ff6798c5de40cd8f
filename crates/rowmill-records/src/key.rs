//! Composite record keys.
//!
//! All records of one workspace share the partition `WORKSPACE#{id}` and
//! are distinguished by a typed sort key prefix.

/// Sort key prefix for column records.
pub const COLUMN_PREFIX: &str = "COLUMN#";
/// Sort key prefix for row records.
pub const ROW_PREFIX: &str = "ROW#";
/// Sort key prefix for upload records.
pub const UPLOAD_PREFIX: &str = "UPLOAD#";

/// Partition shared by all records of one workspace.
pub fn workspace_partition(workspace_id: &str) -> String {
    format!("WORKSPACE#{}", workspace_id)
}

/// `(partition, sort)` address of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub partition: String,
    pub sort: String,
}

impl RecordKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        RecordKey {
            partition: partition.into(),
            sort: sort.into(),
        }
    }

    /// Key of an upload record.
    pub fn upload(workspace_id: &str, upload_id: &str) -> Self {
        Self::new(
            workspace_partition(workspace_id),
            format!("{}{}", UPLOAD_PREFIX, upload_id),
        )
    }

    /// Key of a column record.
    pub fn column(workspace_id: &str, column_id: &str) -> Self {
        Self::new(
            workspace_partition(workspace_id),
            format!("{}{}", COLUMN_PREFIX, column_id),
        )
    }

    /// Key of a row record.
    pub fn row(workspace_id: &str, row_id: &str) -> Self {
        Self::new(
            workspace_partition(workspace_id),
            format!("{}{}", ROW_PREFIX, row_id),
        )
    }
}
