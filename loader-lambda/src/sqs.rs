use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::{Client, error::DisplayErrorContext};
use loader_core::{DeliveryError, MessageSender};

/// Sends lookup requests to the weather data queue.
#[derive(Debug, Clone)]
pub struct SqsMessageSender {
    client: Client,
    queue_url: String,
    delay_seconds: i32,
}

impl SqsMessageSender {
    pub fn new(config: &SdkConfig, queue_url: impl Into<String>, delay_seconds: i32) -> Self {
        Self {
            client: Client::new(config),
            queue_url: queue_url.into(),
            delay_seconds,
        }
    }
}

#[async_trait]
impl MessageSender for SqsMessageSender {
    async fn send(&self, payload: &str) -> Result<String, DeliveryError> {
        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(payload)
            .delay_seconds(self.delay_seconds)
            .send()
            .await
            .map_err(|err| DeliveryError(DisplayErrorContext(&err).to_string()))?;

        output
            .message_id()
            .map(str::to_string)
            .ok_or_else(|| DeliveryError("queue returned no message id".to_string()))
    }
}
