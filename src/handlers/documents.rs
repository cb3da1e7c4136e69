/// Serves cached text objects from the storage bucket
use awskit_core::services::{LoadOutcome, StorageService};
use awskit_lambda::{FunctionResult, error_response, json_response};
use http::StatusCode;
use serde_json::json;

pub async fn get(storage: &StorageService, name: &str) -> FunctionResult {
    let response = match storage.fetch(name).await {
        LoadOutcome::Hit(content) => json_response(
            StatusCode::OK,
            &json!({ "name": name, "content": content }),
        ),
        LoadOutcome::NotFound => error_response(
            StatusCode::NOT_FOUND,
            "DocumentNotFound",
            &format!("Document '{}' does not exist", name),
        ),
        // failure detail is already logged by the storage service
        LoadOutcome::Failed(_) => error_response(
            StatusCode::BAD_GATEWAY,
            "StorageUnavailable",
            "Document could not be loaded",
        ),
    };
    FunctionResult::Http(response)
}
