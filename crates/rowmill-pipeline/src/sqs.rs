//! SQS event source.
//!
//! Long-polls the notification queue and turns message bodies into
//! object-created events. Messages are deleted once decoded; a message
//! whose body is not an event envelope is logged and dropped rather than
//! left to redeliver forever.

use async_trait::async_trait;
use aws_sdk_sqs::Client;

use crate::event::{decode_storage_event, ObjectCreatedEvent};
use crate::runner::EventSource;

/// Longest long-poll wait SQS allows, in seconds.
const MAX_WAIT_TIME_SECS: u64 = 20;
const MAX_MESSAGES_PER_POLL: i32 = 10;

/// Event source reading storage notifications from an SQS queue.
pub struct SqsEventSource {
    client: Client,
    queue_url: String,
    wait_time_secs: u64,
}

impl SqsEventSource {
    pub async fn new(
        queue_url: impl Into<String>,
        region: Option<String>,
        wait_time_secs: u64,
    ) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region));
        }
        let config = config_loader.load().await;
        let client = Client::new(&config);

        SqsEventSource {
            client,
            queue_url: queue_url.into(),
            wait_time_secs: wait_time_secs.min(MAX_WAIT_TIME_SECS),
        }
    }
}

#[async_trait]
impl EventSource for SqsEventSource {
    async fn next_batch(&self) -> anyhow::Result<Vec<ObjectCreatedEvent>> {
        let resp = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(MAX_MESSAGES_PER_POLL)
            .wait_time_seconds(self.wait_time_secs as i32)
            .send()
            .await?;

        let mut events = Vec::new();
        for message in resp.messages() {
            if let Some(body) = message.body() {
                match decode_storage_event(body) {
                    Some(decoded) => events.extend(decoded),
                    None => {
                        tracing::warn!(
                            message_id = message.message_id().unwrap_or("unknown"),
                            "Dropping message with unparseable event envelope"
                        );
                    }
                }
            }

            if let Some(receipt) = message.receipt_handle() {
                self.client
                    .delete_message()
                    .queue_url(&self.queue_url)
                    .receipt_handle(receipt)
                    .send()
                    .await?;
            }
        }

        Ok(events)
    }
}
