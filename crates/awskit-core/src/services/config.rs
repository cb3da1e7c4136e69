/// Configuration service - loads config from environment variables
use crate::error::AwsKitError;
use crate::models::{
    AuthConfig, AuthorizationRequirement, AwsSettings, EmailConfig, EventsConfig, StorageConfig,
    ToolkitConfig,
};

/// Environment variable-based configuration provider
#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    config: ToolkitConfig,
}

impl EnvConfigProvider {
    pub fn new() -> Result<Self, AwsKitError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AwsKitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = ToolkitConfig {
            aws: AwsSettings {
                region: var("AWS_REGION"),
                endpoint_url: var("AWS_ENDPOINT_URL"),
            },
            storage: StorageConfig {
                bucket: var("STORAGE_BUCKET")
                    .ok_or_else(|| AwsKitError::Config("Missing STORAGE_BUCKET".to_string()))?,
                prefix: var("STORAGE_PREFIX"),
            },
            events: EventsConfig {
                topic_arn: var("EVENT_TOPIC_ARN"),
                source: var("EVENT_SOURCE").unwrap_or_else(|| EventsConfig::default().source),
            },
            email: EmailConfig {
                default_sender: var("EMAIL_SENDER"),
            },
            auth: AuthConfig {
                requirement: var("AUTHORIZATION")
                    .map(|v| v.parse::<AuthorizationRequirement>().unwrap_or_default())
                    .unwrap_or(AuthorizationRequirement::Unknown),
                jwks_json: var("JWKS_JSON"),
                issuer: var("JWT_ISSUER"),
                api_key: var("API_KEY"),
            },
        };

        config
            .validate()
            .map_err(|e| AwsKitError::Config(format!("Invalid configuration: {}", e)))?;

        tracing::info!(
            bucket = %config.storage.bucket,
            events_enabled = config.events.topic_arn.is_some(),
            authorization = %config.auth.requirement,
            "Configuration validated successfully"
        );

        Ok(Self { config })
    }

    /// Configuration is immutable for the lifetime of the execution environment
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn into_config(self) -> ToolkitConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_bucket() {
        let result = EnvConfigProvider::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(AwsKitError::Config(_))));
    }

    #[test]
    fn test_full_environment() {
        let provider = EnvConfigProvider::from_lookup(lookup(&[
            ("STORAGE_BUCKET", "templates"),
            ("STORAGE_PREFIX", "email/"),
            ("EVENT_TOPIC_ARN", "arn:aws:sns:eu-west-1:123456789012:events"),
            ("EVENT_SOURCE", "billing"),
            ("EMAIL_SENDER", "noreply@example.com"),
            ("AUTHORIZATION", "Required"),
            ("API_KEY", "secret"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();

        let config = provider.config();
        assert_eq!(config.storage.bucket, "templates");
        assert_eq!(config.storage.prefix.as_deref(), Some("email/"));
        assert_eq!(config.events.source, "billing");
        assert_eq!(config.email.default_sender.as_deref(), Some("noreply@example.com"));
        assert_eq!(config.auth.requirement, AuthorizationRequirement::Required);
        assert_eq!(config.aws.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_defaults_and_blank_values() {
        let config = EnvConfigProvider::from_lookup(lookup(&[
            ("STORAGE_BUCKET", "templates"),
            ("EVENT_TOPIC_ARN", "  "),
        ]))
        .unwrap()
        .into_config();

        assert!(config.events.topic_arn.is_none());
        assert_eq!(config.events.source, "awskit");
        assert_eq!(config.auth.requirement, AuthorizationRequirement::Unknown);
    }

    #[test]
    fn test_required_auth_without_credentials_is_invalid() {
        let result = EnvConfigProvider::from_lookup(lookup(&[
            ("STORAGE_BUCKET", "templates"),
            ("AUTHORIZATION", "required"),
        ]));
        assert!(result.is_err());
    }
}
