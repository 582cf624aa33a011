//! Presence handlers
//!
//! Endpoints for recording activity and querying who is currently present.

use axum::extract::State;
use presence_service::dto::{
    PresenceRecordResponse, PresenceSummaryResponse, PurgeResponse, RecordActivityRequest,
    ThresholdQuery, TouchRequest,
};
use presence_service::RegistryService;

use crate::extractors::{ApiQuery, SessionIdPath, ValidatedJson};
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// List active sessions, most recent first
///
/// GET /presence
pub async fn list_active(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ThresholdQuery>,
) -> ApiResult<ApiJson<Vec<PresenceRecordResponse>>> {
    let ctx = state.service_context();
    let threshold = ctx.resolve_threshold(query.threshold_secs)?;

    let records = RegistryService::new(ctx).list_active_now(threshold);
    Ok(ApiJson(records.into_iter().map(PresenceRecordResponse::from).collect()))
}

/// Record an activity signal
///
/// POST /presence
pub async fn record_activity(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecordActivityRequest>,
) -> ApiResult<ApiJson<PresenceRecordResponse>> {
    let metadata = request.metadata();
    let service = RegistryService::new(state.service_context());
    let record = service.record_activity(&request.session_id, request.user_id, metadata)?;
    Ok(ApiJson(record.into()))
}

/// Get a single session
///
/// GET /presence/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    SessionIdPath(session_id): SessionIdPath,
) -> ApiResult<ApiJson<PresenceRecordResponse>> {
    let service = RegistryService::new(state.service_context());
    let record = service.get(&session_id)?;
    Ok(ApiJson(record.into()))
}

/// Record a page view on a known session
///
/// PATCH /presence/{session_id}
pub async fn touch(
    State(state): State<AppState>,
    SessionIdPath(session_id): SessionIdPath,
    ValidatedJson(request): ValidatedJson<TouchRequest>,
) -> ApiResult<ApiJson<PresenceRecordResponse>> {
    let service = RegistryService::new(state.service_context());
    let record = service.touch(&session_id, &request.page, Some(request.duration))?;
    Ok(ApiJson(record.into()))
}

/// Remove a single session
///
/// DELETE /presence/{session_id}
pub async fn remove_session(
    State(state): State<AppState>,
    SessionIdPath(session_id): SessionIdPath,
) -> ApiResult<ApiJson<PurgeResponse>> {
    let service = RegistryService::new(state.service_context());
    let removed = service.remove(&session_id)?;
    Ok(ApiJson(PurgeResponse::new(removed)))
}

/// Purge every inactive session
///
/// DELETE /presence/inactive
pub async fn purge_inactive(State(state): State<AppState>) -> ApiResult<ApiJson<PurgeResponse>> {
    let removed = RegistryService::new(state.service_context()).purge_inactive_now();
    Ok(ApiJson(PurgeResponse::new(removed)))
}

/// Active visitor statistics
///
/// GET /presence/stats
pub async fn stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ThresholdQuery>,
) -> ApiResult<ApiJson<PresenceSummaryResponse>> {
    let ctx = state.service_context();
    let threshold = ctx.resolve_threshold(query.threshold_secs)?;
    Ok(ApiJson(RegistryService::new(ctx).summary_now(threshold)))
}
