//! Rowmill Storage Library
//!
//! This crate provides the object store abstraction and its backends.
//! The extraction pipeline only ever needs "fetch bytes plus content-type
//! hint by key" and "size by key", so the trait stays that small.
//!
//! # Object key format
//!
//! Uploaded files live under `workspaces/{workspaceId}/uploads/{uploadId}/{fileName}`.
//! Keys must not contain `..` or a leading `/`. Key generation and parsing are
//! centralized in the `keys` module so the upload issuer and the notification
//! handler cannot drift apart.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_object_store;
pub use keys::{parse_upload_object_key, upload_object_key, ParsedUploadKey};
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use rowmill_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{FetchedObject, ObjectStore, StorageError, StorageResult};
