/// Email send request and result models
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A message handed to the email service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    /// May be left empty when the service has a default sender
    #[builder(setter(into))]
    #[serde(default)]
    pub sender: String,
    #[builder(default)]
    #[serde(default)]
    pub to: Vec<String>,
    #[builder(default)]
    #[serde(default)]
    pub cc: Vec<String>,
    #[builder(default)]
    #[serde(default)]
    pub bcc: Vec<String>,
    #[builder(setter(into))]
    pub subject: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
}

impl EmailMessage {
    /// Every address in to, cc and bcc
    pub fn recipients(&self) -> impl Iterator<Item = &String> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }

    pub fn has_recipients(&self) -> bool {
        self.recipients().next().is_some()
    }
}

/// Result of a send attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SendOutcome {
    #[serde(rename_all = "camelCase")]
    Sent {
        message_id: String,
        http_status_code: u16,
    },
    Rejected { errors: Vec<String> },
}

impl SendOutcome {
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::Rejected {
            errors: vec![error.into()],
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Sent { message_id, .. } => Some(message_id),
            Self::Rejected { .. } => None,
        }
    }
}
