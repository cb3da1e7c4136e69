/// Function context - shared state for all handlers
use crate::auth::{ApiKeyAuthorizer, Authorizer, DenyAllAuthorizer, JwtAuthorizer};
use crate::executor::FunctionExecutor;
use awskit_core::AwsKitError;
use awskit_core::models::{AuthorizationRequirement, ToolkitConfig};
use awskit_core::services::{
    AwsClients, DynamoDbItemStore, EmailService, EnvConfigProvider, EventBus, ItemStore,
    StorageService,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a handler needs, built once per execution environment
#[derive(Clone)]
pub struct FunctionContext {
    pub config: ToolkitConfig,

    pub clients: AwsClients,

    /// Cached S3 objects (templates, documents)
    pub storage: Arc<StorageService>,

    pub email: Arc<EmailService>,

    /// `None` when no topic is configured
    pub events: Option<Arc<EventBus>>,

    pub items: Arc<dyn ItemStore>,

    pub executor: FunctionExecutor,
}

impl FunctionContext {
    /// Reads configuration from the environment and builds the context
    pub async fn new() -> Result<Arc<Self>, AwsKitError> {
        let config = EnvConfigProvider::new()?.into_config();
        let clients = AwsClients::load(&config).await;
        Ok(Arc::new(Self::from_parts(config, clients)?))
    }

    pub fn from_parts(config: ToolkitConfig, clients: AwsClients) -> Result<Self, AwsKitError> {
        let mut storage = StorageService::from_s3(clients.s3.clone(), &config.storage.bucket);
        if let Some(prefix) = &config.storage.prefix {
            storage = storage.with_prefix(prefix);
        }
        let storage = Arc::new(storage);

        let mut email = EmailService::from_ses(clients.ses.clone()).with_templates(storage.clone());
        if let Some(sender) = &config.email.default_sender {
            email = email.with_default_sender(sender);
        }

        let events = config.events.topic_arn.as_ref().map(|topic| {
            Arc::new(EventBus::from_sns(
                clients.sns.clone(),
                topic,
                &config.events.source,
            ))
        });

        let items: Arc<dyn ItemStore> = Arc::new(DynamoDbItemStore::new(clients.dynamodb.clone()));

        let executor = FunctionExecutor::new(build_authorizer(&config)?);

        info!(
            bucket = %config.storage.bucket,
            events_enabled = events.is_some(),
            authorization = %config.auth.requirement,
            "Function context initialized"
        );

        Ok(Self {
            config,
            clients,
            storage,
            email: Arc::new(email),
            events,
            items,
            executor,
        })
    }

    pub fn requirement(&self) -> AuthorizationRequirement {
        self.config.auth.requirement
    }
}

/// JWKS wins over an API key; with neither, every token is rejected
fn build_authorizer(config: &ToolkitConfig) -> Result<Arc<dyn Authorizer>, AwsKitError> {
    match (&config.auth.jwks_json, &config.auth.api_key) {
        (Some(jwks), _) => {
            let mut authorizer = JwtAuthorizer::new(jwks)?;
            if let Some(issuer) = &config.auth.issuer {
                authorizer = authorizer.with_issuer(issuer);
            }
            Ok(Arc::new(authorizer))
        }
        (None, Some(key)) => {
            info!("Using API key authorization");
            Ok(Arc::new(ApiKeyAuthorizer::new(key)))
        }
        (None, None) => {
            if config.auth.requirement == AuthorizationRequirement::Required {
                warn!("No JWKS or API key configured; bearer tokens will be rejected");
            }
            Ok(Arc::new(DenyAllAuthorizer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::{BehaviorVersion, Region, SdkConfig};
    use crate::response::FunctionResult;
    use awskit_core::models::{AuthConfig, EventsConfig, StorageConfig};
    use http::StatusCode;
    use lambda_http::Body;

    fn clients() -> AwsClients {
        AwsClients::from_sdk_config(
            &SdkConfig::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new("us-east-1"))
                .build(),
        )
    }

    fn config() -> ToolkitConfig {
        ToolkitConfig {
            storage: StorageConfig {
                bucket: "assets".to_string(),
                prefix: Some("templates/".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_from_parts_without_topic() {
        let ctx = FunctionContext::from_parts(config(), clients()).unwrap();
        assert!(ctx.events.is_none());
        assert_eq!(ctx.storage.bucket(), "assets");
        assert_eq!(ctx.requirement(), AuthorizationRequirement::Unknown);
    }

    #[test]
    fn test_from_parts_with_topic() {
        let mut config = config();
        config.events = EventsConfig {
            topic_arn: Some("arn:aws:sns:us-east-1:123456789012:events".to_string()),
            source: "orders".to_string(),
        };

        let ctx = FunctionContext::from_parts(config, clients()).unwrap();
        assert_eq!(
            ctx.events.unwrap().topic_arn(),
            "arn:aws:sns:us-east-1:123456789012:events"
        );
    }

    async fn call(ctx: &FunctionContext, authorization: &str) -> StatusCode {
        let request = http::Request::builder()
            .uri("/documents/welcome")
            .header("Authorization", authorization)
            .body(Body::Empty)
            .unwrap();
        ctx.executor
            .execute(ctx.requirement(), request, |_| async {
                Ok(FunctionResult::Payload(serde_json::json!({"ok": true})))
            })
            .await
            .status()
    }

    #[tokio::test]
    async fn test_api_key_config_authorizes_matching_bearer() {
        let mut config = config();
        config.auth = AuthConfig {
            requirement: AuthorizationRequirement::Required,
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let ctx = FunctionContext::from_parts(config, clients()).unwrap();
        assert_eq!(call(&ctx, "Bearer secret").await, StatusCode::OK);
        assert_eq!(call(&ctx, "Bearer wrong").await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_jwks_fails() {
        let mut config = config();
        config.auth = AuthConfig {
            requirement: AuthorizationRequirement::Required,
            jwks_json: Some("{}".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            FunctionContext::from_parts(config, clients()),
            Err(AwsKitError::Config(_))
        ));
    }
}
