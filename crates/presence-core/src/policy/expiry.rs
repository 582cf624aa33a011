//! Expiry policy - pure liveness decision for presence records
//!
//! Nothing in here reads a clock. Callers always pass `now` explicitly.

use chrono::{DateTime, Duration, Utc};

use crate::entities::PresenceRecord;

/// A record is active iff `now - last_activity_at <= threshold`
#[inline]
pub fn is_active(record: &PresenceRecord, now: DateTime<Utc>, threshold: Duration) -> bool {
    record.idle_for(now) <= threshold
}

/// Negation of [`is_active`]
#[inline]
pub fn is_stale(record: &PresenceRecord, now: DateTime<Utc>, threshold: Duration) -> bool {
    !is_active(record, now, threshold)
}

/// Configured inactivity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    threshold: Duration,
}

impl ExpiryPolicy {
    /// Default inactivity threshold (5 minutes)
    pub const DEFAULT_THRESHOLD_SECS: i64 = 300;

    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        Self::new(Duration::seconds(secs))
    }

    #[must_use]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn is_active(&self, record: &PresenceRecord, now: DateTime<Utc>) -> bool {
        is_active(record, now, self.threshold)
    }

    /// Oldest `last_activity_at` still considered active at `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.threshold
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_THRESHOLD_SECS)
    }
}
