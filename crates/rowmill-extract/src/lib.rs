//! Rowmill Extract Library
//!
//! Pure extraction logic: sniff a payload's format, run the matching
//! extractor against the workspace's column schema, and coerce raw values
//! into column-typed scalars. Everything in this crate is deterministic
//! given the payload text and the column list, performs no I/O, and never
//! fails outright; extractors degrade to simpler extractors instead.

pub mod coerce;
pub mod extractor;
pub mod normalize;
pub mod sniffer;

// Re-export commonly used types
pub use coerce::coerce_value;
pub use extractor::{extract, extract_from_csv, extract_from_json, extract_from_text, Extraction};
pub use normalize::normalize_name;
pub use sniffer::{sniff_format, PayloadFormat};
