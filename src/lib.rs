// Library root - exports public API

pub mod handlers;

pub use handlers::{AppState, handle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
