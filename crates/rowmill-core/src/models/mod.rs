//! Data models for the extraction pipeline
//!
//! Columns describe a workspace's schema, uploads track one submitted file
//! through its extraction lifecycle, and rows hold the structured result.

mod column;
mod row;
mod upload;

// Re-export all models for convenient imports
pub use column::*;
pub use row::*;
pub use upload::*;
