//! Health Routes
//!
//! - GET /health/live  - Liveness probe
//! - GET /health/ready - Readiness probe (checks the store)
//! - GET /health       - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = match state.store.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if store == "ok" { "healthy" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        store,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
