//! Shared name normalization.
//!
//! All fuzzy matching in the extractors (JSON keys, CSV headers, enum
//! values) goes through this one function so the rules cannot drift
//! between call sites.

/// Normalize a name for fuzzy comparison: trim, lowercase, and collapse
/// runs of internal whitespace to a single space.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
