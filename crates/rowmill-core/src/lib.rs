//! Rowmill Core Library
//!
//! This crate provides the core domain models, configuration, identifiers,
//! and constants that are shared across all Rowmill components.

pub mod config;
pub mod constants;
pub mod ids;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use ids::new_id;
pub use models::*;
pub use storage_types::StorageBackend;
