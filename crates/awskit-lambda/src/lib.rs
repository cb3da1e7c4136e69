/// awskit Lambda - request execution for Lambda function handlers
///
/// Authorization, request logging, error responses and the
/// [`FunctionExecutor`] that ties them together around a handler.
pub mod auth;
pub mod context;
pub mod error;
pub mod executor;
pub mod middleware;
pub mod response;

pub use auth::{
    ApiKeyAuthorizer, AuthorizationOutcome, Authorizer, DenyAllAuthorizer, JwtAuthorizer,
    extract_bearer,
};
pub use context::FunctionContext;
pub use error::{ErrorBody, error_response};
pub use executor::FunctionExecutor;
pub use response::{FunctionResult, json_response, parse_json_body};
