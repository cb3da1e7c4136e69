/// AWS client registration
use crate::models::ToolkitConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

/// The SDK clients handlers work with, built once per execution environment
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub ses: aws_sdk_ses::Client,
    pub sns: aws_sdk_sns::Client,
    pub dynamodb: aws_sdk_dynamodb::Client,
}

impl AwsClients {
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::build(sdk_config, false)
    }

    /// Loads the shared SDK configuration, honouring the configured region and
    /// endpoint override
    pub async fn load(config: &ToolkitConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.aws.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.aws.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!(
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            endpoint = ?config.aws.endpoint_url,
            "AWS clients configured"
        );

        // Custom endpoints (LocalStack) do not resolve virtual-hosted buckets
        Self::build(&sdk_config, config.aws.endpoint_url.is_some())
    }

    fn build(sdk_config: &SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            ses: aws_sdk_ses::Client::new(sdk_config),
            sns: aws_sdk_sns::Client::new(sdk_config),
            dynamodb: aws_sdk_dynamodb::Client::new(sdk_config),
        }
    }
}
