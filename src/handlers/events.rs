/// Event publishing endpoint
use awskit_core::AwsKitError;
use awskit_core::services::EventBus;
use awskit_lambda::{FunctionResult, error_response, json_response, parse_json_body};
use http::StatusCode;
use lambda_http::Request;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
}

/// Publish failures are returned as errors and become `UnhandledError`
pub async fn publish(
    events: Option<&EventBus>,
    request: &Request,
) -> Result<FunctionResult, AwsKitError> {
    let Some(bus) = events else {
        return Ok(FunctionResult::Http(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "EventsDisabled",
            "No event topic is configured",
        )));
    };

    let body: PublishEventRequest = match parse_json_body::<PublishEventRequest>(request) {
        Ok(body) if !body.event_type.trim().is_empty() => body,
        Ok(_) => {
            return Ok(FunctionResult::Http(error_response(
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                "eventType is required",
            )));
        }
        Err(e) => {
            return Ok(FunctionResult::Http(error_response(
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                &e.to_string(),
            )));
        }
    };

    let receipt = bus.publish(&body.event_type, body.payload).await?;
    Ok(FunctionResult::Http(json_response(StatusCode::ACCEPTED, &receipt)))
}
