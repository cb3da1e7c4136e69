/// Request logging
use awskit_core::constants::{AUTHORIZATION_HEADER, REQUEST_ID_HEADER};
use awskit_core::utils::logging::redact_token;
use http::StatusCode;
use lambda_http::{Request, RequestExt};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Logs an incoming request and returns its request id
///
/// The id comes from the Lambda context, then the `x-amzn-requestid` header,
/// and is generated when neither is present. Headers are logged at debug level
/// with the authorization value redacted.
pub fn log_request(request: &Request) -> String {
    let request_id = request
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .filter(|id| !id.is_empty())
        .or_else(|| {
            request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Incoming request"
    );

    for (name, value) in request.headers() {
        let value = value.to_str().unwrap_or("<binary>");
        if name.as_str() == AUTHORIZATION_HEADER {
            debug!(request_id = %request_id, header = %name, value = %redact_token(value), "Request header");
        } else {
            debug!(request_id = %request_id, header = %name, value = %value, "Request header");
        }
    }

    request_id
}

pub fn log_completion(request_id: &str, status: StatusCode, duration: Duration) {
    if status.is_client_error() || status.is_server_error() {
        warn!(
            request_id = %request_id,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::Body;

    #[test]
    fn test_request_id_from_header() {
        let request = http::Request::builder()
            .uri("/orders")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::Empty)
            .unwrap();

        assert_eq!(log_request(&request), "req-42");
    }

    #[test]
    fn test_request_id_generated_when_absent() {
        let request = http::Request::builder()
            .uri("/orders")
            .body(Body::Empty)
            .unwrap();

        let id1 = log_request(&request);
        let id2 = log_request(&request);
        assert!(Uuid::parse_str(&id1).is_ok());
        assert_ne!(id1, id2, "Request IDs should be unique");
    }
}
