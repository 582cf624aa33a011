//! Presence record entity - liveness state of a single session

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::SessionId;

/// Client hints attached to a record, replaced wholesale on every activity
pub type Metadata = BTreeMap<String, String>;

/// Well-known metadata keys
pub mod metadata_keys {
    pub const PAGE: &str = "page";
    pub const REFERRER: &str = "referrer";
    pub const DEVICE: &str = "device";
    pub const BROWSER: &str = "browser";
    pub const OS: &str = "os";
    pub const USER_AGENT: &str = "userAgent";
    /// Seconds spent on the previous page, reported by a touch
    pub const DURATION: &str = "duration";
}

/// Presence record entity
///
/// Records are never mutated in place by the registry. Every change builds a
/// replacement value which the store swaps in atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub session_id: SessionId,
    pub user_id: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl PresenceRecord {
    /// Create a record for a session seen for the first time
    pub fn new(
        session_id: SessionId,
        user_id: Option<String>,
        metadata: Metadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            user_id,
            first_seen_at: now,
            last_activity_at: now,
            metadata,
        }
    }

    /// Build the replacement for a new activity signal on this session
    ///
    /// `first_seen_at` is kept, `user_id` is kept once set, metadata is replaced.
    /// `last_activity_at` never moves backwards.
    #[must_use]
    pub fn with_activity(
        &self,
        user_id: Option<String>,
        metadata: Metadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: self.session_id.clone(),
            user_id: self.user_id.clone().or(user_id),
            first_seen_at: self.first_seen_at,
            last_activity_at: self.last_activity_at.max(now),
            metadata,
        }
    }

    /// Build the replacement for a page view on this session
    ///
    /// Only `page`, `duration` and `last_activity_at` change.
    #[must_use]
    pub fn with_page_view(
        &self,
        page: &str,
        duration_on_page: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.insert(metadata_keys::PAGE.to_string(), page.to_string());
        match duration_on_page {
            Some(secs) => {
                metadata.insert(metadata_keys::DURATION.to_string(), secs.to_string());
            }
            None => {
                metadata.remove(metadata_keys::DURATION);
            }
        }

        Self {
            session_id: self.session_id.clone(),
            user_id: self.user_id.clone(),
            first_seen_at: self.first_seen_at,
            last_activity_at: self.last_activity_at.max(now),
            metadata,
        }
    }

    /// Time elapsed since the last activity
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_activity_at)
    }

    /// Current page, if reported
    pub fn page(&self) -> Option<&str> {
        self.metadata.get(metadata_keys::PAGE).map(String::as_str)
    }

    /// Look up a metadata entry
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
