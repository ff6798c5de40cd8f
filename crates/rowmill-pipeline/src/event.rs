//! Storage notification decoding.
//!
//! Notifications arrive as the standard S3 event envelope
//! `{"Records":[{"s3":{"bucket":{"name":…},"object":{"key":…}}}]}`.
//! Decoding reduces each record to an [`ObjectCreatedEvent`] and undoes the
//! key encoding the notification side applies.

use percent_encoding::percent_decode_str;
use serde::Deserialize;

/// One object-created notification, reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreatedEvent {
    pub bucket: String,
    /// Object key, already percent-decoded.
    pub key: String,
}

#[derive(Deserialize)]
struct EventEnvelope {
    #[serde(rename = "Records", default)]
    records: Vec<EventRecord>,
}

#[derive(Deserialize)]
struct EventRecord {
    s3: S3Entity,
}

#[derive(Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Decode a notification body into its object-created events.
///
/// `None` means the body is not an event envelope. An envelope without
/// records decodes to an empty batch.
pub fn decode_storage_event(body: &str) -> Option<Vec<ObjectCreatedEvent>> {
    let envelope: EventEnvelope = serde_json::from_str(body).ok()?;
    Some(
        envelope
            .records
            .into_iter()
            .map(|record| ObjectCreatedEvent {
                bucket: record.s3.bucket.name,
                key: decode_object_key(&record.s3.object.key),
            })
            .collect(),
    )
}

/// Undo the notification key encoding: `+` means space, then percent
/// escapes are resolved.
pub fn decode_object_key(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    percent_decode_str(&unplussed).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_object_key_plus_and_percent() {
        assert_eq!(
            decode_object_key("workspaces/ws-1/uploads/up-1/my+file+%281%29.json"),
            "workspaces/ws-1/uploads/up-1/my file (1).json"
        );
    }

    #[test]
    fn test_decode_object_key_plain_key_unchanged() {
        assert_eq!(
            decode_object_key("workspaces/ws-1/uploads/up-1/invoice.json"),
            "workspaces/ws-1/uploads/up-1/invoice.json"
        );
    }

    #[test]
    fn test_decode_storage_event() {
        let body = r#"{
            "Records": [
                {"s3": {"bucket": {"name": "rowmill-uploads"},
                        "object": {"key": "workspaces/ws-1/uploads/up-1/a+b.csv"}}},
                {"s3": {"bucket": {"name": "rowmill-uploads"},
                        "object": {"key": "workspaces/ws-1/uploads/up-2/c.json"}}}
            ]
        }"#;

        let events = decode_storage_event(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].bucket, "rowmill-uploads");
        assert_eq!(events[0].key, "workspaces/ws-1/uploads/up-1/a b.csv");
        assert_eq!(events[1].key, "workspaces/ws-1/uploads/up-2/c.json");
    }

    #[test]
    fn test_decode_storage_event_without_records() {
        let events = decode_storage_event(r#"{"Event": "s3:TestEvent"}"#).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_decode_storage_event_rejects_non_envelope() {
        assert!(decode_storage_event("not json").is_none());
        assert!(decode_storage_event(r#""just a string""#).is_none());
        assert!(decode_storage_event(r#"{"Records": [{"sqs": {}}]}"#).is_none());
    }
}
