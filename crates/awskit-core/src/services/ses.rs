/// SES email sending service
use crate::error::AwsKitError;
use crate::models::{EmailMessage, SendOutcome};
use crate::services::storage::StorageService;
use crate::utils::logging::redact_recipients;
use crate::utils::retry::{RetryConfig, retry_with_backoff};
use crate::utils::template::{missing_params, render_template};
use crate::utils::validation::validate_email_address;
use async_trait::async_trait;
use aws_sdk_ses::error::DisplayErrorContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

const CHARSET: &str = "UTF-8";

/// Delivers a single, already validated message
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Returns the provider's message id
    async fn send_email(&self, message: &EmailMessage) -> Result<String, AwsKitError>;
}

pub struct SesEmailSender {
    client: aws_sdk_ses::Client,
    retry: RetryConfig,
}

impl SesEmailSender {
    pub fn new(client: aws_sdk_ses::Client) -> Self {
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

fn content(data: &str) -> Result<aws_sdk_ses::types::Content, AwsKitError> {
    aws_sdk_ses::types::Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| AwsKitError::Email(format!("Failed to build message content: {}", e)))
}

#[async_trait]
impl EmailSender for SesEmailSender {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, AwsKitError> {
        use aws_sdk_ses::types::{Body, Destination, Message};

        // Build the request once, outside the retry loop
        let destination = Destination::builder()
            .set_to_addresses(Some(message.to.clone()))
            .set_cc_addresses(Some(message.cc.clone()))
            .set_bcc_addresses(Some(message.bcc.clone()))
            .build();

        let mut body = Body::builder();
        if let Some(html) = &message.html_body {
            body = body.html(content(html)?);
        }
        if let Some(text) = &message.text_body {
            body = body.text(content(text)?);
        }

        let ses_message = Message::builder()
            .subject(content(&message.subject)?)
            .body(body.build())
            .build();

        let response = retry_with_backoff(
            || {
                let client = self.client.clone();
                let source = message.sender.clone();
                let destination = destination.clone();
                let ses_message = ses_message.clone();

                async move {
                    client
                        .send_email()
                        .source(source)
                        .destination(destination)
                        .message(ses_message)
                        .send()
                        .await
                        .map_err(|e| {
                            let text = format!("SES send_email failed: {}", DisplayErrorContext(&e));
                            match e.into_service_error() {
                                err if err.is_message_rejected()
                                    || err.is_mail_from_domain_not_verified_exception() =>
                                {
                                    AwsKitError::Validation(text)
                                }
                                _ => AwsKitError::Email(text),
                            }
                        })
                }
            },
            self.retry.clone(),
            "ses_send_email",
        )
        .await?;

        Ok(response.message_id().to_string())
    }
}

/// Email facade: validates, renders templates and never fails outright.
///
/// Every problem ends up in [`SendOutcome::Rejected`].
pub struct EmailService {
    sender: Box<dyn EmailSender>,
    templates: Option<Arc<StorageService>>,
    default_sender: Option<String>,
}

impl EmailService {
    pub fn new(sender: impl EmailSender + 'static) -> Self {
        Self {
            sender: Box::new(sender),
            templates: None,
            default_sender: None,
        }
    }

    pub fn from_ses(client: aws_sdk_ses::Client) -> Self {
        Self::new(SesEmailSender::new(client))
    }

    /// Templates for [`send_templated`](Self::send_templated) are loaded from `storage`
    pub fn with_templates(mut self, storage: Arc<StorageService>) -> Self {
        self.templates = Some(storage);
        self
    }

    /// Sender used when a message leaves `sender` empty
    pub fn with_default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = Some(sender.into());
        self
    }

    pub async fn send(&self, mut message: EmailMessage) -> SendOutcome {
        if message.sender.trim().is_empty()
            && let Some(default_sender) = &self.default_sender
        {
            message.sender = default_sender.clone();
        }

        let errors = validate_message(&message);
        if !errors.is_empty() {
            warn!(errors = ?errors, "Email rejected by validation");
            return SendOutcome::Rejected { errors };
        }

        match self.sender.send_email(&message).await {
            Ok(message_id) => {
                info!(
                    message_id = %message_id,
                    to = %redact_recipients(&message.to),
                    "Sent email"
                );
                SendOutcome::Sent {
                    message_id,
                    http_status_code: 200,
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to send email");
                SendOutcome::rejected(e.to_string())
            }
        }
    }

    /// Loads `template_name`, substitutes `$[param]` tokens and sends the result
    /// as the HTML body. The rendered text also becomes the text body unless the
    /// message already carries one.
    pub async fn send_templated(
        &self,
        template_name: &str,
        params: &HashMap<String, String>,
        mut message: EmailMessage,
    ) -> SendOutcome {
        let Some(templates) = &self.templates else {
            error!(template = template_name, "No template storage configured");
            return SendOutcome::rejected("template storage is not configured");
        };

        let template = templates.load(template_name).await;
        if template.is_empty() {
            return SendOutcome::rejected(format!(
                "template '{}' not found or empty",
                template_name
            ));
        }

        let missing = missing_params(&template, params);
        if !missing.is_empty() {
            warn!(
                template = template_name,
                missing = ?missing,
                "Template placeholders left unrendered"
            );
        }

        let rendered = render_template(&template, params);
        if message.text_body.is_none() {
            message.text_body = Some(rendered.clone());
        }
        message.html_body = Some(rendered);

        self.send(message).await
    }
}

/// Lists every problem with `message`; empty when it can be sent
pub fn validate_message(message: &EmailMessage) -> Vec<String> {
    let mut errors = Vec::new();

    if message.sender.trim().is_empty() {
        errors.push("sender is required".to_string());
    } else if let Err(e) = validate_email_address(&message.sender) {
        errors.push(e.to_string());
    }

    if !message.has_recipients() {
        errors.push("at least one recipient is required".to_string());
    }
    for address in message.recipients() {
        if let Err(e) = validate_email_address(address) {
            errors.push(e.to_string());
        }
    }

    if message.subject.trim().is_empty() {
        errors.push("subject is required".to_string());
    }

    if message.html_body.is_none() && message.text_body.is_none() {
        errors.push("an HTML or text body is required".to_string());
    }

    errors
}
