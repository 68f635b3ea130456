/// Health and status endpoints
///
/// # Endpoints
///
/// ```text
/// GET /health      # liveness for load balancers
/// GET /api/status  # environment report for the front end
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,

    /// Application version
    pub version: String,
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub environment: String,
}

/// Health check handler
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2024-05-01T12:00:00Z",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// API status handler
pub async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        message: "AI Toolbox API is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment().to_string(),
    })
}
