/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health and status endpoints
/// - `auth`: Register, login, logout and current user
/// - `tools`: Tool catalog, simulators and favorites
/// - `user`: Per-user stats, history, timeline, feedback and recommendations

pub mod auth;
pub mod health;
pub mod tools;
pub mod user;

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Decodes a JSON body into `T`, rejecting type mismatches with 400
pub(crate) fn parse_body<T: DeserializeOwned>(body: JsonValue) -> ApiResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
