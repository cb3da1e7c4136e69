/// Health check
use awskit_lambda::FunctionResult;
use serde_json::json;

pub fn handler() -> FunctionResult {
    FunctionResult::Payload(json!({
        "status": "ok",
        "version": crate::VERSION,
        "coreVersion": awskit_core::VERSION,
    }))
}
