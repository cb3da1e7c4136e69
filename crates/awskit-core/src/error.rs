/// Error types for awskit
use crate::models::attributes::MappingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsKitError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Item already exists: {0}")]
    AlreadyExists(String),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AwsKitError {
    /// Determines if an error is retriable
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Storage(_) => true,
            Self::Email(_) => true, // throttling and transient SES failures
            Self::Messaging(_) => true,
            Self::Database(_) => true,
            Self::AlreadyExists(_) => false,
            Self::Mapping(_) => false,
            Self::Config(_) => false,
            Self::Validation(_) => false,
            Self::Authorization(_) => false,
            Self::Handler(_) => false,
            Self::Unknown(_) => false,
        }
    }
}

impl From<serde_json::Error> for AwsKitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::env::VarError> for AwsKitError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_errors() {
        assert!(AwsKitError::Storage("test".to_string()).is_retriable());
        assert!(AwsKitError::Messaging("test".to_string()).is_retriable());
        assert!(!AwsKitError::Validation("test".to_string()).is_retriable());
        assert!(!AwsKitError::AlreadyExists("pk".to_string()).is_retriable());
    }

    #[test]
    fn test_error_display() {
        let err = AwsKitError::Database("throttled".to_string());
        assert_eq!(err.to_string(), "Database error: throttled");
    }

    #[test]
    fn test_mapping_error_conversion() {
        let err: AwsKitError = MappingError::NotAnObject.into();
        assert!(matches!(err, AwsKitError::Mapping(_)));
        assert!(!err.is_retriable());
    }
}
