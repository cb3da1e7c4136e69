/// Handler results and JSON helpers
use crate::error::error_response;
use awskit_core::AwsKitError;
use awskit_core::constants::CORRELATION_HEADER;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What a handler produced
#[derive(Debug)]
pub enum FunctionResult {
    /// Structured response; the executor adds the correlation header
    Http(Response<Body>),
    /// Bare JSON payload, returned as-is
    Payload(Value),
}

impl FunctionResult {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Http(response) => response.status(),
            Self::Payload(_) => StatusCode::OK,
        }
    }

    pub fn as_http(&self) -> Option<&Response<Body>> {
        match self {
            Self::Http(response) => Some(response),
            Self::Payload(_) => None,
        }
    }

    /// The `x-ds-token` header value, if one was attached
    pub fn correlation_token(&self) -> Option<&str> {
        self.as_http()?
            .headers()
            .get(CORRELATION_HEADER)?
            .to_str()
            .ok()
    }

    pub fn into_response(self) -> Response<Body> {
        match self {
            Self::Http(response) => response,
            Self::Payload(value) => json_response(StatusCode::OK, &value),
        }
    }
}

impl From<Response<Body>> for FunctionResult {
    fn from(response: Response<Body>) -> Self {
        Self::Http(response)
    }
}

impl From<Value> for FunctionResult {
    fn from(value: Value) -> Self {
        Self::Payload(value)
    }
}

/// Serializes `value` as the JSON body of a response with `status`
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_string(value) {
        Ok(body) => {
            let mut response = Response::new(Body::from(body));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SerializationError",
            &format!("Failed to serialize response: {}", e),
        ),
    }
}

/// Decodes the request body as JSON
pub fn parse_json_body<T: DeserializeOwned>(request: &Request) -> Result<T, AwsKitError> {
    let bytes: &[u8] = request.body().as_ref();
    if bytes.is_empty() {
        return Err(AwsKitError::Validation("Request body is empty".to_string()));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| AwsKitError::Validation(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        name: String,
    }

    fn request(body: Body) -> Request {
        http::Request::builder()
            .uri("/greet")
            .body(body)
            .unwrap()
    }

    #[test]
    fn test_parse_json_body_text_and_binary() {
        let parsed: Greeting = parse_json_body(&request(Body::from(r#"{"name":"Ada"}"#))).unwrap();
        assert_eq!(parsed.name, "Ada");

        let parsed: Greeting =
            parse_json_body(&request(Body::from(br#"{"name":"Bob"}"#.to_vec()))).unwrap();
        assert_eq!(parsed.name, "Bob");
    }

    #[test]
    fn test_parse_json_body_errors() {
        let result: Result<Greeting, _> = parse_json_body(&request(Body::Empty));
        assert!(matches!(result, Err(AwsKitError::Validation(_))));

        let result: Result<Greeting, _> = parse_json_body(&request(Body::from("{")));
        assert!(matches!(result, Err(AwsKitError::Validation(_))));
    }

    #[test]
    fn test_payload_into_response() {
        let result = FunctionResult::from(json!({"ok": true}));
        assert_eq!(result.status(), StatusCode::OK);
        assert!(result.correlation_token().is_none());

        let response = result.into_response();
        let body: Value = serde_json::from_slice(response.body().as_ref()).unwrap();
        assert_eq!(body["ok"], true);
    }

    #[test]
    fn test_json_response() {
        let response = json_response(StatusCode::CREATED, &json!({"id": 7}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
