//! Health check endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
}

/// Basic health check (is the server running?)
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: chrono::Utc::now().timestamp() - state.started_at,
    })
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    store: bool,
}

/// Readiness check (is the user store reachable?)
pub async fn ready_check(
    State(state): State<AppState>,
) -> Result<Json<ReadyResponse>, StatusCode> {
    match state.auth.users().ping().await {
        Ok(()) => Ok(Json(ReadyResponse {
            status: "ready",
            store: true,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            // Return 503 if not ready
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
