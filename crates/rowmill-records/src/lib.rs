//! Rowmill Records Library
//!
//! Workspaces, columns, uploads, and rows live in one table addressed by
//! `(partition, sort)` composite keys:
//!
//! - upload → `(WORKSPACE#{workspaceId}, UPLOAD#{uploadId})`
//! - column → `(WORKSPACE#{workspaceId}, COLUMN#{columnId})`
//! - row    → `(WORKSPACE#{workspaceId}, ROW#{rowId})`
//!
//! The `RecordStore` trait captures the four operations the pipeline
//! performs against that table; `WorkspaceRepository` layers the typed
//! models on top of it.

#[cfg(feature = "dynamodb")]
pub mod dynamo;
pub mod key;
pub mod memory;
pub mod repository;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoRecordStore;
pub use key::{workspace_partition, RecordKey};
pub use memory::MemoryRecordStore;
pub use repository::WorkspaceRepository;
pub use traits::{Document, RecordError, RecordResult, RecordStore};
