//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Field names are camelCase and timestamps serialize as RFC 3339.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Presence Responses
// ============================================================================

/// Presence record as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecordResponse {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

/// Result of a purge or explicit removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub removed_count: usize,
}

impl PurgeResponse {
    pub fn new(removed_count: usize) -> Self {
        Self { removed_count }
    }
}

/// Active visitor statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSummaryResponse {
    /// Records active at the evaluation time
    pub active_count: usize,
    /// Records held by the store, stale ones included
    pub total_tracked: usize,
    pub by_page: BTreeMap<String, usize>,
    pub by_device: BTreeMap<String, usize>,
    pub by_browser: BTreeMap<String, usize>,
    pub by_os: BTreeMap<String, usize>,
    /// Distinct non-empty user ids among active records
    pub identified_users: usize,
    pub threshold_secs: i64,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Readiness detail for the registry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub store: String,
    pub tracked_sessions: usize,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool, tracked_sessions: usize) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
                tracked_sessions,
            },
        }
    }
}
