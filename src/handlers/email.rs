/// Email sending endpoint
use awskit_core::AwsKitError;
use awskit_core::models::{EmailMessage, SendOutcome};
use awskit_core::services::EmailService;
use awskit_lambda::{FunctionResult, json_response, parse_json_body};
use http::StatusCode;
use lambda_http::Request;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    /// Template object name; when set its rendering becomes the body
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub params: HashMap<String, String>,
    pub message: EmailMessage,
}

pub async fn send(email: &EmailService, request: &Request) -> Result<FunctionResult, AwsKitError> {
    let body: SendEmailRequest = match parse_json_body(request) {
        Ok(body) => body,
        Err(e) => {
            return Ok(FunctionResult::Http(json_response(
                StatusCode::BAD_REQUEST,
                &SendOutcome::rejected(e.to_string()),
            )));
        }
    };

    let outcome = match &body.template {
        Some(template) => {
            email
                .send_templated(template, &body.params, body.message)
                .await
        }
        None => email.send(body.message).await,
    };

    let status = if outcome.is_sent() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok(FunctionResult::Http(json_response(status, &outcome)))
}
