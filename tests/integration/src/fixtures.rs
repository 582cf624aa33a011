//! Test fixtures and data generators
//!
//! Provides reusable request bodies and typed views of API responses.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Desktop Chrome on Windows
pub const CHROME_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Mobile Safari on iPhone
pub const SAFARI_IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";

/// Record activity request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub page: String,
    pub user_agent: String,
    pub referrer: String,
}

impl ActivityRequest {
    pub fn new(session_id: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: None,
            page: page.into(),
            user_agent: String::new(),
            referrer: String::new(),
        }
    }

    /// Request for a fresh session id
    pub fn unique(page: impl Into<String>) -> Self {
        Self::new(format!("session-{}", unique_suffix()), page)
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }
}

/// Touch request body
#[derive(Debug, Clone, Serialize)]
pub struct TouchRequest {
    pub page: String,
    pub duration: u64,
}

impl TouchRequest {
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            duration: 0,
        }
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration = secs;
        self
    }
}

/// Success envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Presence record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub session_id: String,
    pub user_id: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

impl PresenceRecord {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Purge / remove result
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Removed {
    pub removed_count: usize,
}

/// Presence statistics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub active_count: usize,
    pub total_tracked: usize,
    pub by_page: BTreeMap<String, usize>,
    pub by_device: BTreeMap<String, usize>,
    pub by_browser: BTreeMap<String, usize>,
    pub by_os: BTreeMap<String, usize>,
    pub identified_users: usize,
    pub threshold_secs: i64,
}
