/// Configuration models
use crate::constants::DEFAULT_EVENT_SOURCE;
use crate::utils::validation::validate_topic_arn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an invocation must present a valid credential
///
/// `Unknown` is what an unset or unrecognised setting parses to and is never a
/// valid runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationRequirement {
    #[default]
    Unknown,
    Required,
    NotRequired,
}

impl FromStr for AuthorizationRequirement {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Ok(match normalized.as_str() {
            "required" => Self::Required,
            "notrequired" => Self::NotRequired,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for AuthorizationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Required => "required",
            Self::NotRequired => "not_required",
        };
        f.write_str(name)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub aws: AwsSettings,
    pub storage: StorageConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ToolkitConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.storage.bucket.trim().is_empty() {
            return Err("Storage bucket not configured".to_string());
        }

        if let Some(arn) = &self.events.topic_arn {
            validate_topic_arn(arn).map_err(|_| format!("Invalid event topic ARN: {}", arn))?;
        }

        if let Some(endpoint) = &self.aws.endpoint_url
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(format!("Invalid endpoint URL: {}", endpoint));
        }

        if self.auth.requirement == AuthorizationRequirement::Required
            && self.auth.jwks_json.is_none()
            && self.auth.api_key.is_none()
        {
            return Err("Authorization is required but neither JWKS nor API key is set".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AwsSettings {
    #[serde(default)]
    pub region: Option<String>,
    /// Override for every service endpoint (LocalStack and friends)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Prepended to every object name loaded through the cache
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    #[serde(default)]
    pub topic_arn: Option<String>,
    #[serde(default = "default_event_source")]
    pub source: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            topic_arn: None,
            source: default_event_source(),
        }
    }
}

fn default_event_source() -> String {
    DEFAULT_EVENT_SOURCE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub default_sender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub requirement: AuthorizationRequirement,
    #[serde(default)]
    pub jwks_json: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ToolkitConfig {
        ToolkitConfig {
            storage: StorageConfig {
                bucket: "templates-bucket".to_string(),
                prefix: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_requirement_parsing() {
        assert_eq!(
            "required".parse::<AuthorizationRequirement>().unwrap(),
            AuthorizationRequirement::Required
        );
        assert_eq!(
            "NotRequired".parse::<AuthorizationRequirement>().unwrap(),
            AuthorizationRequirement::NotRequired
        );
        assert_eq!(
            "not_required".parse::<AuthorizationRequirement>().unwrap(),
            AuthorizationRequirement::NotRequired
        );
        assert_eq!(
            "maybe".parse::<AuthorizationRequirement>().unwrap(),
            AuthorizationRequirement::Unknown
        );
        assert_eq!(AuthorizationRequirement::default(), AuthorizationRequirement::Unknown);
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "storage": { "bucket": "templates-bucket", "prefix": "templates/" },
            "events": { "topic_arn": "arn:aws:sns:us-east-1:123456789012:events" },
            "auth": { "requirement": "not_required" }
        }"#;

        let config: ToolkitConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.storage.prefix.as_deref(), Some("templates/"));
        assert_eq!(config.events.source, DEFAULT_EVENT_SOURCE);
        assert_eq!(config.auth.requirement, AuthorizationRequirement::NotRequired);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.storage.bucket = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.events.topic_arn = Some("events".to_string());
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.aws.endpoint_url = Some("localhost:4566".to_string());
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.requirement = AuthorizationRequirement::Required;
        assert!(config.validate().is_err());
        config.auth.api_key = Some("k".to_string());
        assert!(config.validate().is_ok());
    }
}
