use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::key::RecordKey;
use crate::traits::{Document, RecordResult, RecordStore};

/// In-memory record store used for tests and local development.
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<(String, String), Document>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        MemoryRecordStore {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &RecordKey) -> RecordResult<Option<Document>> {
        let records = self.records.read().await;
        Ok(records
            .get(&(key.partition.clone(), key.sort.clone()))
            .cloned())
    }

    async fn put(&self, key: &RecordKey, document: Document) -> RecordResult<()> {
        let mut records = self.records.write().await;
        records.insert((key.partition.clone(), key.sort.clone()), document);
        Ok(())
    }

    async fn update(&self, key: &RecordKey, fields: Document) -> RecordResult<()> {
        let mut records = self.records.write().await;
        let document = records
            .entry((key.partition.clone(), key.sort.clone()))
            .or_default();
        for (name, value) in fields {
            document.insert(name, value);
        }
        Ok(())
    }

    async fn query_prefix(
        &self,
        partition: &str,
        sort_prefix: &str,
    ) -> RecordResult<Vec<Document>> {
        let records = self.records.read().await;
        let start = (partition.to_string(), sort_prefix.to_string());
        Ok(records
            .range((Bound::Included(start), Bound::Unbounded))
            .take_while(|((p, s), _)| p == partition && s.starts_with(sort_prefix))
            .map(|(_, document)| document.clone())
            .collect())
    }
}
