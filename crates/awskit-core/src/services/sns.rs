/// SNS publishing and the event bus built on it
use crate::constants::EVENT_TYPE_ATTRIBUTE;
use crate::error::AwsKitError;
use crate::models::{EventEnvelope, PublishReceipt};
use crate::utils::retry::{RetryConfig, retry_with_backoff};
use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publishes `message` to `topic_arn` with string message attributes
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<PublishReceipt, AwsKitError>;
}

/// Serializes `value` to JSON and publishes it without attributes
pub async fn publish_json<T>(
    publisher: &dyn MessagePublisher,
    topic_arn: &str,
    value: &T,
) -> Result<PublishReceipt, AwsKitError>
where
    T: Serialize + ?Sized,
{
    let message = serde_json::to_string(value)
        .map_err(|e| AwsKitError::Messaging(format!("Failed to serialize message: {}", e)))?;
    publisher.publish(topic_arn, &message, &HashMap::new()).await
}

pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    retry: RetryConfig,
}

impl SnsPublisher {
    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl MessagePublisher for SnsPublisher {
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<PublishReceipt, AwsKitError> {
        use aws_sdk_sns::types::MessageAttributeValue;

        let message_attributes = attributes
            .iter()
            .map(|(name, value)| {
                MessageAttributeValue::builder()
                    .data_type("String")
                    .string_value(value)
                    .build()
                    .map(|attr| (name.clone(), attr))
                    .map_err(|e| {
                        AwsKitError::Messaging(format!("Invalid message attribute {}: {}", name, e))
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let response = retry_with_backoff(
            || {
                let client = self.client.clone();
                let topic = topic_arn.to_string();
                let body = message.to_string();
                let attrs = message_attributes.clone();

                async move {
                    client
                        .publish()
                        .topic_arn(topic)
                        .message(body)
                        .set_message_attributes((!attrs.is_empty()).then_some(attrs))
                        .send()
                        .await
                        .map_err(|e| {
                            let text = format!("SNS publish failed: {}", DisplayErrorContext(&e));
                            match e.into_service_error() {
                                err if err.is_not_found_exception()
                                    || err.is_invalid_parameter_exception() =>
                                {
                                    AwsKitError::Validation(text)
                                }
                                _ => AwsKitError::Messaging(text),
                            }
                        })
                }
            },
            self.retry.clone(),
            "sns_publish",
        )
        .await?;

        let message_id = response
            .message_id()
            .ok_or_else(|| AwsKitError::Messaging("No message ID returned".to_string()))?
            .to_string();

        info!(topic = %topic_arn, message_id = %message_id, "Published message");

        Ok(PublishReceipt {
            message_id,
            sequence_number: response.sequence_number().map(str::to_string),
        })
    }
}

/// Publishes typed events, wrapped in an [`EventEnvelope`], to one topic
pub struct EventBus {
    publisher: Box<dyn MessagePublisher>,
    topic_arn: String,
    source: String,
}

impl EventBus {
    pub fn new(
        publisher: impl MessagePublisher + 'static,
        topic_arn: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            publisher: Box::new(publisher),
            topic_arn: topic_arn.into(),
            source: source.into(),
        }
    }

    pub fn from_sns(
        client: aws_sdk_sns::Client,
        topic_arn: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::new(SnsPublisher::new(client), topic_arn, source)
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }

    pub async fn publish<T>(&self, event_type: &str, payload: T) -> Result<PublishReceipt, AwsKitError>
    where
        T: Serialize + Send,
    {
        let envelope = EventEnvelope::new(event_type, self.source.as_str(), payload);
        let body = serde_json::to_string(&envelope)
            .map_err(|e| AwsKitError::Messaging(format!("Failed to serialize event: {}", e)))?;

        let attributes = HashMap::from([(EVENT_TYPE_ATTRIBUTE.to_string(), event_type.to_string())]);

        let receipt = self
            .publisher
            .publish(&self.topic_arn, &body, &attributes)
            .await?;

        info!(
            event_id = %envelope.event_id,
            event_type = event_type,
            message_id = %receipt.message_id,
            "Published event"
        );
        Ok(receipt)
    }
}
