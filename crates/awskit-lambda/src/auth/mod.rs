/// Bearer-token authorization
pub mod jwt;

pub use jwt::{Claims, JwtAuthorizer};

use async_trait::async_trait;
use awskit_core::constants::{BEARER_PREFIX, ERROR_CODE_UNAUTHORIZED};
use http::StatusCode;

/// What an authorizer decided about a token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationOutcome {
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl AuthorizationOutcome {
    pub fn ok() -> Self {
        Self {
            status: Some(StatusCode::OK.as_u16()),
            ..Default::default()
        }
    }

    pub fn denied(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.as_u16()),
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self.status, Some(200) | Some(100))
    }
}

/// Decides on a raw bearer token. The executor only looks at the returned
/// status: `200 OK` and `100 Continue` let the handler run.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, token: &str) -> AuthorizationOutcome;
}

/// Rejects every token; used when no token authorizer is configured
pub struct DenyAllAuthorizer;

#[async_trait]
impl Authorizer for DenyAllAuthorizer {
    async fn authorize(&self, _token: &str) -> AuthorizationOutcome {
        AuthorizationOutcome::denied(
            StatusCode::UNAUTHORIZED,
            ERROR_CODE_UNAUTHORIZED,
            "No token authorizer is configured",
        )
    }
}

/// Accepts the bearer token only when it equals a shared API key
pub struct ApiKeyAuthorizer {
    key: String,
}

impl ApiKeyAuthorizer {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Authorizer for ApiKeyAuthorizer {
    async fn authorize(&self, token: &str) -> AuthorizationOutcome {
        if !token.is_empty() && token == self.key {
            return AuthorizationOutcome::ok();
        }
        AuthorizationOutcome::denied(
            StatusCode::UNAUTHORIZED,
            ERROR_CODE_UNAUTHORIZED,
            "API key is missing or does not match",
        )
    }
}

/// Strips a leading `Bearer ` (any case) from an authorization header value.
/// A missing header yields an empty token.
pub fn extract_bearer(header: Option<&str>) -> String {
    let Some(value) = header else {
        return String::new();
    };
    let value = value.trim();

    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            value[BEARER_PREFIX.len()..].trim().to_string()
        }
        _ => value.to_string(),
    }
}
