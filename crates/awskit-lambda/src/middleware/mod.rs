/// Middleware modules
pub mod logging;

pub use logging::{log_completion, log_request};
