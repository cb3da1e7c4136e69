/// awskit core - shared AWS helpers for Lambda functions
///
/// Configuration, client registration, the cached S3 object loader and thin
/// wrappers over SES, SNS and DynamoDB. Request execution lives in
/// `awskit-lambda`.
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::AwsKitError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
