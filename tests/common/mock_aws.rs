/// Mock AWS services for integration testing
use async_trait::async_trait;
use awskit_core::AwsKitError;
use awskit_core::models::{EmailMessage, PublishReceipt};
use awskit_core::services::{EmailSender, MessagePublisher, ObjectStore, ObjectStoreError};
use awskit_lambda::{AuthorizationOutcome, Authorizer};
use http::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock S3 bucket
#[derive(Clone, Default)]
pub struct MockS3 {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub gets: Arc<AtomicUsize>,
}

impl MockS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_object(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn delete_object(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MockS3 {
    async fn get(&self, _bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(ObjectStoreError::NotFound)
    }
}

/// Mock SES that records every message
#[derive(Clone, Default)]
pub struct MockSES {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockSES {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<EmailMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmailSender for MockSES {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, AwsKitError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("ses-{}", sent.len()))
    }
}

/// Mock SNS topic
#[derive(Clone, Default)]
pub struct MockSNS {
    pub messages: Arc<Mutex<Vec<(String, String, HashMap<String, String>)>>>,
    pub fail: bool,
}

impl MockSNS {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<(String, String, HashMap<String, String>)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagePublisher for MockSNS {
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<PublishReceipt, AwsKitError> {
        if self.fail {
            return Err(AwsKitError::Messaging("topic unavailable".to_string()));
        }
        let mut messages = self.messages.lock().unwrap();
        messages.push((topic_arn.to_string(), message.to_string(), attributes.clone()));
        Ok(PublishReceipt {
            message_id: format!("sns-{}", messages.len()),
            sequence_number: None,
        })
    }
}

/// Accepts one fixed token
#[derive(Default)]
pub struct MockAuthorizer {
    pub valid_token: String,
    pub calls: AtomicUsize,
}

impl MockAuthorizer {
    pub fn accepting(token: &str) -> Arc<Self> {
        Arc::new(Self {
            valid_token: token.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authorizer for MockAuthorizer {
    async fn authorize(&self, token: &str) -> AuthorizationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == self.valid_token {
            AuthorizationOutcome::ok()
        } else {
            AuthorizationOutcome::denied(StatusCode::UNAUTHORIZED, "InvalidToken", "token rejected")
        }
    }
}
