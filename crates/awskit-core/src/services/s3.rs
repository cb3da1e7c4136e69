/// S3 object access
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectStoreError {
    #[error("object not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

/// Read access to a remote object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;
}

/// S3-backed object store
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                let message = format!("S3 get_object failed: {}", DisplayErrorContext(&e));
                match e.into_service_error() {
                    err if err.is_no_such_key() => ObjectStoreError::NotFound,
                    _ if status == Some(404) => ObjectStoreError::NotFound,
                    _ => ObjectStoreError::Other(message),
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Other(format!("Failed to read S3 object body: {}", e)))?
            .into_bytes()
            .to_vec();

        tracing::debug!(
            "Downloaded from s3://{}/{} ({} bytes)",
            bucket,
            key,
            data.len()
        );
        Ok(data)
    }
}
