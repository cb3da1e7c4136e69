//! Common test utilities and helpers for integration tests
#![allow(dead_code)]

pub mod mock_aws;

use lambda_http::{Body, Request};

/// Builds a request with an optional bearer token
pub fn request(method: &str, path: &str, token: Option<&str>, body: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or(Body::Empty);
    builder.body(body).expect("valid test request")
}

/// Decodes a JSON response body
pub fn json_body(response: &lambda_http::Response<Body>) -> serde_json::Value {
    serde_json::from_slice(response.body().as_ref()).expect("JSON response body")
}

/// Generate a unique correlation ID for tests
pub fn generate_correlation_id() -> String {
    format!("test-corr-{}", uuid::Uuid::new_v4())
}
