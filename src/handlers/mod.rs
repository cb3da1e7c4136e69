/// HTTP handlers and routing
pub mod documents;
pub mod email;
pub mod events;
pub mod health;

use awskit_core::AwsKitError;
use awskit_core::models::AuthorizationRequirement;
use awskit_core::services::{EmailService, EventBus, StorageService};
use awskit_lambda::{FunctionContext, FunctionExecutor, FunctionResult, error_response};
use http::{Method, StatusCode};
use lambda_http::{Body, Request, Response};
use std::sync::Arc;

/// Services the handlers use
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageService>,
    pub email: Arc<EmailService>,
    pub events: Option<Arc<EventBus>>,
}

impl AppState {
    pub fn from_context(ctx: &FunctionContext) -> Self {
        Self {
            storage: ctx.storage.clone(),
            email: ctx.email.clone(),
            events: ctx.events.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Document(&'a str),
    SendEmail,
    PublishEvent,
    NotFound,
}

fn resolve<'a>(method: &Method, path: &'a str) -> Route<'a> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (&Method::GET, ["health"]) => Route::Health,
        (&Method::GET, ["documents", name]) if !name.is_empty() => Route::Document(*name),
        (&Method::POST, ["emails"]) => Route::SendEmail,
        (&Method::POST, ["events"]) => Route::PublishEvent,
        _ => Route::NotFound,
    }
}

/// Routes `request` to its handler through the executor
///
/// The health check is always public; every other route uses `requirement`.
pub async fn handle(
    state: &AppState,
    executor: &FunctionExecutor,
    requirement: AuthorizationRequirement,
    request: Request,
) -> Response<Body> {
    let path = request.uri().path().to_string();
    let route = resolve(request.method(), &path);

    let requirement = match route {
        Route::Health => AuthorizationRequirement::NotRequired,
        _ => requirement,
    };

    executor
        .execute(requirement, request, |request| dispatch(state, route, request))
        .await
        .into_response()
}

async fn dispatch(
    state: &AppState,
    route: Route<'_>,
    request: Request,
) -> Result<FunctionResult, AwsKitError> {
    match route {
        Route::Health => Ok(health::handler()),
        Route::Document(name) => Ok(documents::get(&state.storage, name).await),
        Route::SendEmail => email::send(&state.email, &request).await,
        Route::PublishEvent => events::publish(state.events.as_deref(), &request).await,
        Route::NotFound => Ok(FunctionResult::Http(error_response(
            StatusCode::NOT_FOUND,
            "NotFound",
            &format!("No route for {} {}", request.method(), request.uri().path()),
        ))),
    }
}
