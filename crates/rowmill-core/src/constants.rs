//! Application-wide constants.

/// Hard ceiling on payload size for inline extraction, in bytes.
/// Larger objects are failed before the body is buffered.
pub const MAX_INLINE_EXTRACT_BYTES: u64 = 5 * 1024 * 1024;

/// Error message recorded on an upload rejected by the size ceiling.
pub const OVERSIZE_ERROR: &str = "File too large for inline extraction";

/// Confidence at or above which an extracted row counts as parsed and
/// the upload as succeeded.
pub const PARSED_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Per-extractor confidence ceilings. Empirical tuning knobs; any change
/// here changes user-visible upload statuses.
pub const JSON_CONFIDENCE_CAP: f64 = 0.95;
pub const CSV_CONFIDENCE_CAP: f64 = 0.9;
pub const TEXT_CONFIDENCE_CAP: f64 = 0.85;
