/// Error responses returned to the caller
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use lambda_http::{Body, Response};
use serde::{Deserialize, Serialize};

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub error_message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: code.into(),
            error_message: message.into(),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response<Body> {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            format!(
                r#"{{"errorCode":"{}","errorMessage":""}}"#,
                self.error_code
            )
        });

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response<Body> {
    ErrorBody::new(code, message).into_response(status)
}
