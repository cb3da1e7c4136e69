/// Application constants
///
/// Hardcoded values used across the awskit crates, grouped by concern.
// ============================================================================
// Request Execution
// ============================================================================
/// Correlation header attached to every structured response
pub const CORRELATION_HEADER: &str = "x-ds-token";

/// Header carrying the bearer credential
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Header carrying the API Gateway request id when no Lambda context is present
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// Prefix stripped from the authorization header value
pub const BEARER_PREFIX: &str = "Bearer ";

// ============================================================================
// Error Codes
// ============================================================================

/// Authorization requirement was never configured
pub const ERROR_CODE_INVALID_CONFIGURATION: &str = "InvalidConfiguration";

/// Authorizer rejected the request without supplying its own code
pub const ERROR_CODE_UNAUTHORIZED: &str = "Unauthorized";

/// Handler failed or panicked
pub const ERROR_CODE_UNHANDLED: &str = "UnhandledError";

/// Message returned to callers when a handler fails
pub const UNHANDLED_ERROR_MESSAGE: &str = "An unexpected error occurred while processing the request";

// ============================================================================
// Messaging
// ============================================================================

/// Default `source` of published events
pub const DEFAULT_EVENT_SOURCE: &str = "awskit";

/// SNS message attribute carrying the event type
pub const EVENT_TYPE_ATTRIBUTE: &str = "eventType";

// ============================================================================
// Timestamps
// ============================================================================

/// Ticks (100ns intervals) between 0001-01-01T00:00:00Z and the Unix epoch
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks per second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

// ============================================================================
// Retry Configuration
// ============================================================================

/// Maximum number of retries for transient failures
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 200;

/// Maximum delay for exponential backoff in milliseconds
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Jitter factor for retry delays (0.0 to 1.0)
pub const RETRY_JITTER_FACTOR: f64 = 0.1;
