/// Input validation utilities
use crate::error::AwsKitError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Accepts `user@domain.tld` and `Display Name <user@domain.tld>`
pub fn validate_email_address(email: &str) -> Result<(), AwsKitError> {
    let address = match (email.rfind('<'), email.rfind('>')) {
        (Some(start), Some(end)) if start < end => &email[start + 1..end],
        _ => email,
    };

    if EMAIL_REGEX.is_match(address.trim()) {
        Ok(())
    } else {
        Err(AwsKitError::Validation(format!(
            "Invalid email address: {}",
            email
        )))
    }
}

pub fn validate_topic_arn(arn: &str) -> Result<(), AwsKitError> {
    if arn.starts_with("arn:") && arn.split(':').count() >= 6 {
        Ok(())
    } else {
        Err(AwsKitError::Validation(format!("Invalid topic ARN: {}", arn)))
    }
}
