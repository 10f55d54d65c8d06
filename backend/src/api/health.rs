//! Health check handler

use crate::api::response::ApiResponse;
use crate::api::AppState;
use axum::extract::State;
use serde::Serialize;

/// Liveness report
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// "up" when the store answers a round-trip, "down" otherwise
    pub database: String,
}

/// GET /api/health - Service and store status
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            "down"
        }
    };

    ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
