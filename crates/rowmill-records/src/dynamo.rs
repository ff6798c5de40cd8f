use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

use crate::key::RecordKey;
use crate::traits::{Document, RecordError, RecordResult, RecordStore};

const PARTITION_ATTR: &str = "PK";
const SORT_ATTR: &str = "SK";

/// Record store backed by a single DynamoDB table with a `PK`/`SK` key pair.
pub struct DynamoRecordStore {
    client: Client,
    table: String,
}

impl DynamoRecordStore {
    pub async fn new(table: impl Into<String>, region: Option<String>) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region));
        }
        let config = config_loader.load().await;
        let client = Client::new(&config);

        DynamoRecordStore {
            client,
            table: table.into(),
        }
    }

    fn key_attributes(&self, key: &RecordKey) -> HashMap<String, AttributeValue> {
        let mut attributes = HashMap::new();
        attributes.insert(
            PARTITION_ATTR.to_string(),
            AttributeValue::S(key.partition.clone()),
        );
        attributes.insert(SORT_ATTR.to_string(), AttributeValue::S(key.sort.clone()));
        attributes
    }
}

fn to_attribute_value(value: &serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null(true),
        serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
        serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
        serde_json::Value::String(s) => AttributeValue::S(s.clone()),
        serde_json::Value::Array(items) => {
            AttributeValue::L(items.iter().map(to_attribute_value).collect())
        }
        serde_json::Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}

fn from_attribute_value(value: &AttributeValue) -> RecordResult<serde_json::Value> {
    match value {
        AttributeValue::Null(_) => Ok(serde_json::Value::Null),
        AttributeValue::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        AttributeValue::N(n) => {
            // Integers must survive as integers or serde rejects integer fields.
            if let Ok(i) = n.parse::<i64>() {
                return Ok(serde_json::Value::from(i));
            }
            n.parse::<f64>()
                .map(serde_json::Value::from)
                .map_err(|e| RecordError::BackendError(format!("Invalid number attribute: {}", e)))
        }
        AttributeValue::S(s) => Ok(serde_json::Value::String(s.clone())),
        AttributeValue::L(items) => Ok(serde_json::Value::Array(
            items
                .iter()
                .map(from_attribute_value)
                .collect::<RecordResult<Vec<_>>>()?,
        )),
        AttributeValue::M(fields) => {
            let mut document = serde_json::Map::new();
            for (name, value) in fields {
                document.insert(name.clone(), from_attribute_value(value)?);
            }
            Ok(serde_json::Value::Object(document))
        }
        other => Err(RecordError::BackendError(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

fn document_from_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> RecordResult<Document> {
    let mut document = Document::new();
    for (name, value) in attributes {
        if name == PARTITION_ATTR || name == SORT_ATTR {
            continue;
        }
        document.insert(name.clone(), from_attribute_value(value)?);
    }
    Ok(document)
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn get(&self, key: &RecordKey) -> RecordResult<Option<Document>> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(self.key_attributes(key)))
            .send()
            .await
            .map_err(|e| RecordError::BackendError(e.to_string()))?;

        match resp.item() {
            Some(attributes) => Ok(Some(document_from_attributes(attributes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &RecordKey, document: Document) -> RecordResult<()> {
        let mut attributes = self.key_attributes(key);
        for (name, value) in &document {
            attributes.insert(name.clone(), to_attribute_value(value));
        }

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| RecordError::BackendError(e.to_string()))?;

        Ok(())
    }

    async fn update(&self, key: &RecordKey, fields: Document) -> RecordResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut expression_parts = Vec::with_capacity(fields.len());
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for (index, (name, value)) in fields.iter().enumerate() {
            let name_placeholder = format!("#f{}", index);
            let value_placeholder = format!(":v{}", index);
            expression_parts.push(format!("{} = {}", name_placeholder, value_placeholder));
            names.insert(name_placeholder, name.clone());
            values.insert(value_placeholder, to_attribute_value(value));
        }

        self.client
            .update_item()
            .table_name(&self.table)
            .set_key(Some(self.key_attributes(key)))
            .update_expression(format!("SET {}", expression_parts.join(", ")))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .map_err(|e| RecordError::BackendError(e.to_string()))?;

        Ok(())
    }

    async fn query_prefix(
        &self,
        partition: &str,
        sort_prefix: &str,
    ) -> RecordResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let resp = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression("#pk = :pk AND begins_with(#sk, :sk)")
                .expression_attribute_names("#pk", PARTITION_ATTR)
                .expression_attribute_names("#sk", SORT_ATTR)
                .expression_attribute_values(":pk", AttributeValue::S(partition.to_string()))
                .expression_attribute_values(":sk", AttributeValue::S(sort_prefix.to_string()))
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await
                .map_err(|e| RecordError::BackendError(e.to_string()))?;

            for attributes in resp.items() {
                documents.push(document_from_attributes(attributes)?);
            }

            exclusive_start_key = resp.last_evaluated_key().cloned();
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(documents)
    }
}
