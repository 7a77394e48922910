use crate::handlers::account_handler::AppState;
use crate::models::ReadinessResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe; ready only when the account store answers.
///
/// GET /ready
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(target: "account.handlers.health", error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                }),
            )
        }
    }
}
