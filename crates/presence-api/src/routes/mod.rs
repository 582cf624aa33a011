//! Route definitions
//!
//! Presence routes plus health probes. Health is kept separate so it can skip
//! rate limiting.

use axum::{
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use presence_common::ErrorResponse;

use crate::handlers::{health, presence};
use crate::state::AppState;

/// Create the presence router (excluding health for separate middleware handling)
///
/// The static `inactive` and `stats` segments take priority over the
/// `:session_id` capture, so those two ids are reserved.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/presence",
            get(presence::list_active).post(presence::record_activity),
        )
        .route(
            "/presence/inactive",
            delete(presence::purge_inactive),
        )
        .route("/presence/stats", get(presence::stats))
        .route(
            "/presence/:session_id",
            get(presence::get_session)
                .patch(presence::touch)
                .delete(presence::remove_session),
        )
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Fallback for paths no route matches
pub async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}
