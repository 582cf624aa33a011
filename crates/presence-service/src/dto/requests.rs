//! Request DTOs for API endpoints
//!
//! All body DTOs implement `Deserialize` and `Validate` for input validation.

use presence_core::{metadata_keys, ClientHints, Metadata};
use serde::Deserialize;
use validator::Validate;

/// Referrer recorded when the client did not send one
pub const DIRECT_REFERRER: &str = "direct";

// ============================================================================
// Presence Requests
// ============================================================================

/// Record activity request (`POST /presence`)
///
/// `userAgent` and `referrer` must be present but may be empty; an empty
/// referrer is stored as [`DIRECT_REFERRER`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordActivityRequest {
    #[validate(length(min = 1, max = 128, message = "sessionId must be 1-128 characters"))]
    pub session_id: String,

    #[validate(length(min = 1, max = 128, message = "userId must be 1-128 characters"))]
    pub user_id: Option<String>,

    #[validate(length(min = 1, max = 2048, message = "page must be 1-2048 characters"))]
    pub page: String,

    #[validate(length(max = 1024, message = "userAgent must be at most 1024 characters"))]
    pub user_agent: String,

    #[validate(length(max = 2048, message = "referrer must be at most 2048 characters"))]
    pub referrer: String,
}

impl RecordActivityRequest {
    /// Build the metadata map stored on the record
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(metadata_keys::PAGE.to_string(), self.page.clone());

        let referrer = if self.referrer.trim().is_empty() {
            DIRECT_REFERRER
        } else {
            self.referrer.as_str()
        };
        metadata.insert(metadata_keys::REFERRER.to_string(), referrer.to_string());

        let user_agent = self.user_agent.as_str();
        let hints = ClientHints::from_user_agent(user_agent);
        metadata.insert(metadata_keys::DEVICE.to_string(), hints.device.to_string());
        metadata.insert(metadata_keys::BROWSER.to_string(), hints.browser.to_string());
        metadata.insert(metadata_keys::OS.to_string(), hints.os.to_string());

        if !user_agent.is_empty() {
            metadata.insert(metadata_keys::USER_AGENT.to_string(), user_agent.to_string());
        }

        metadata
    }
}

/// Touch request (`PATCH /presence/{sessionId}`)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TouchRequest {
    #[validate(length(min = 1, max = 2048, message = "page must be 1-2048 characters"))]
    pub page: String,

    /// Seconds spent on the previous page
    pub duration: u64,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Optional inactivity threshold override for list and stats
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdQuery {
    pub threshold_secs: Option<u64>,
}
