//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use presence_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check
///
/// GET /health/ready
///
/// The store lives in process memory, so it is ready whenever the server
/// answers. The tracked count is reported for dashboards.
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let tracked = state.service_context().store().len();
    Json(ReadinessResponse::ready(true, tracked))
}
