use awskit::{AppState, handle};
use awskit_lambda::FunctionContext;
use lambda_http::{Error, Request, run, service_fn};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    info!(version = awskit::VERSION, "Starting awskit Lambda function");

    let ctx = FunctionContext::new().await?;
    let state = Arc::new(AppState::from_context(&ctx));

    run(service_fn(|event: Request| {
        let ctx = ctx.clone();
        let state = state.clone();
        async move { Ok::<_, Error>(handle(&state, &ctx.executor, ctx.requirement(), event).await) }
    }))
    .await
}
