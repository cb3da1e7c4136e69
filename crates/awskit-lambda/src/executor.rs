/// Authorized request execution with contained failures
use crate::auth::{Authorizer, extract_bearer};
use crate::error::error_response;
use crate::middleware::{log_completion, log_request};
use crate::response::FunctionResult;
use awskit_core::AwsKitError;
use awskit_core::constants::{
    AUTHORIZATION_HEADER, CORRELATION_HEADER, ERROR_CODE_INVALID_CONFIGURATION,
    ERROR_CODE_UNAUTHORIZED, ERROR_CODE_UNHANDLED, UNHANDLED_ERROR_MESSAGE,
};
use awskit_core::models::AuthorizationRequirement;
use futures::FutureExt;
use http::{HeaderValue, StatusCode};
use lambda_http::Request;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Wraps handler invocations: logs the request, enforces the configured
/// [`AuthorizationRequirement`], contains errors and panics from both the
/// authorizer and the handler, and stamps structured responses with a fresh
/// `x-ds-token`.
#[derive(Clone)]
pub struct FunctionExecutor {
    authorizer: Arc<dyn Authorizer>,
}

impl FunctionExecutor {
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self { authorizer }
    }

    /// Runs `handler` for `request` under `requirement`
    pub async fn execute<F, Fut>(
        &self,
        requirement: AuthorizationRequirement,
        request: Request,
        handler: F,
    ) -> FunctionResult
    where
        F: FnOnce(Request) -> Fut + Send,
        Fut: Future<Output = Result<FunctionResult, AwsKitError>> + Send,
    {
        let start = Instant::now();
        let request_id = log_request(&request);

        let mut result = match requirement {
            AuthorizationRequirement::Unknown => {
                error!(
                    request_id = %request_id,
                    "Authorization requirement is not configured"
                );
                FunctionResult::Http(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ERROR_CODE_INVALID_CONFIGURATION,
                    "Authorization requirement is not configured",
                ))
            }
            AuthorizationRequirement::NotRequired => {
                run_handler(&request_id, request, handler).await
            }
            AuthorizationRequirement::Required => {
                match self.authorize(&request_id, &request).await {
                    Ok(()) => run_handler(&request_id, request, handler).await,
                    Err(denied) => denied,
                }
            }
        };

        if let FunctionResult::Http(response) = &mut result {
            let token = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&token) {
                response.headers_mut().insert(CORRELATION_HEADER, value);
            }
        }

        log_completion(&request_id, result.status(), start.elapsed());
        result
    }

    async fn authorize(&self, request_id: &str, request: &Request) -> Result<(), FunctionResult> {
        let header = request
            .headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok());
        if header.is_none() {
            warn!(request_id = %request_id, "Request has no authorization header");
        }

        let token = extract_bearer(header);
        let outcome = match AssertUnwindSafe(self.authorizer.authorize(&token))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                error!(
                    request_id = %request_id,
                    panic = %panic_message(panic.as_ref()),
                    "Authorizer panicked"
                );
                return Err(unhandled());
            }
        };
        if outcome.is_authorized() {
            info!(request_id = %request_id, "Request authorized");
            return Ok(());
        }

        let status = outcome
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = outcome
            .error_code
            .unwrap_or_else(|| ERROR_CODE_UNAUTHORIZED.to_string());
        let message = outcome.error_message.unwrap_or_default();

        warn!(
            request_id = %request_id,
            status = %status.as_u16(),
            code = %code,
            "Request not authorized"
        );
        Err(FunctionResult::Http(error_response(status, &code, &message)))
    }

    /// Runs a handler that produces no response, gated by an API key instead
    /// of a bearer token. Failures are logged and swallowed.
    pub async fn execute_with_api_key<F, Fut>(
        &self,
        requirement: AuthorizationRequirement,
        api_key: Option<&str>,
        expected_api_key: Option<&str>,
        handler: F,
    ) where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<(), AwsKitError>> + Send,
    {
        match requirement {
            AuthorizationRequirement::Unknown => {
                error!("Authorization requirement is not configured; handler skipped");
                return;
            }
            AuthorizationRequirement::Required => {
                let matches = matches!(
                    (api_key, expected_api_key),
                    (Some(key), Some(expected)) if key == expected
                );
                if !matches {
                    error!(
                        key_present = api_key.is_some(),
                        "API key does not match; handler skipped"
                    );
                    return;
                }
            }
            AuthorizationRequirement::NotRequired => {}
        }

        match AssertUnwindSafe(async move { handler().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Handler failed"),
            Err(panic) => error!(panic = %panic_message(panic.as_ref()), "Handler panicked"),
        }
    }
}

async fn run_handler<F, Fut>(request_id: &str, request: Request, handler: F) -> FunctionResult
where
    F: FnOnce(Request) -> Fut + Send,
    Fut: Future<Output = Result<FunctionResult, AwsKitError>> + Send,
{
    match AssertUnwindSafe(async move { handler(request).await })
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = ?e, "Handler failed");
            unhandled()
        }
        Err(panic) => {
            error!(
                request_id = %request_id,
                panic = %panic_message(panic.as_ref()),
                "Handler panicked"
            );
            unhandled()
        }
    }
}

fn unhandled() -> FunctionResult {
    FunctionResult::Http(error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ERROR_CODE_UNHANDLED,
        UNHANDLED_ERROR_MESSAGE,
    ))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
