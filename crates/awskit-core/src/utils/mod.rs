/// Utility modules
pub mod logging;
pub mod retry;
pub mod template;
pub mod validation;

pub use logging::*;
pub use retry::*;
pub use template::*;
pub use validation::*;
