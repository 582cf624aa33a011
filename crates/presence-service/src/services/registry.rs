//! Registry service
//!
//! Tracks which sessions are currently present. Activity signals create or
//! refresh records, list and purge decide liveness from an explicit `now` and
//! threshold so they stay deterministic under test.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use presence_core::{
    is_active, is_stale, metadata_keys, DomainError, Metadata, PresenceRecord, SessionId,
};
use tracing::{debug, info, instrument};

use crate::dto::PresenceSummaryResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Bucket used in statistics when a record lacks the metadata entry
const UNKNOWN_BUCKET: &str = "unknown";

/// Registry service
pub struct RegistryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegistryService<'a> {
    /// Create a new RegistryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record an activity signal for a session
    ///
    /// Creates the record on first sight. Later signals replace the metadata,
    /// refresh `last_activity_at`, and keep `first_seen_at`. A blank `user_id`
    /// is rejected.
    #[instrument(skip(self, metadata))]
    pub fn record_activity(
        &self,
        session_id: &str,
        user_id: Option<String>,
        metadata: Metadata,
    ) -> ServiceResult<PresenceRecord> {
        let session_id = parse_session_id(session_id)?;
        if user_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ServiceError::validation("userId must not be blank"));
        }
        let now = self.ctx.clock().now();

        let record = self
            .ctx
            .store()
            .upsert_with(&session_id, &mut |current: Option<&PresenceRecord>| {
                Some(match current {
                    Some(existing) => existing.with_activity(user_id.clone(), metadata.clone(), now),
                    None => PresenceRecord::new(
                        session_id.clone(),
                        user_id.clone(),
                        metadata.clone(),
                        now,
                    ),
                })
            })
            .ok_or_else(|| ServiceError::internal("store rejected presence upsert"))?;

        debug!(
            session_id = %record.session_id,
            page = record.page().unwrap_or_default(),
            "Activity recorded"
        );

        Ok(record)
    }

    /// Record a page view on a known session
    #[instrument(skip(self))]
    pub fn touch(
        &self,
        session_id: &str,
        page: &str,
        duration_on_page: Option<u64>,
    ) -> ServiceResult<PresenceRecord> {
        let session_id = parse_session_id(session_id)?;
        if page.trim().is_empty() {
            return Err(ServiceError::validation("page must not be empty"));
        }
        let now = self.ctx.clock().now();

        let record = self
            .ctx
            .store()
            .upsert_with(&session_id, &mut |current: Option<&PresenceRecord>| {
                current.map(|existing| existing.with_page_view(page, duration_on_page, now))
            })
            .ok_or_else(|| DomainError::SessionNotFound(session_id.to_string()))?;

        debug!(session_id = %record.session_id, page, "Page view recorded");

        Ok(record)
    }

    /// Get a single record, stale or not
    #[instrument(skip(self))]
    pub fn get(&self, session_id: &str) -> ServiceResult<PresenceRecord> {
        let session_id = parse_session_id(session_id)?;
        self.ctx
            .store()
            .get(session_id.as_str())
            .ok_or_else(|| DomainError::SessionNotFound(session_id.into_inner()).into())
    }

    /// Remove a single record
    #[instrument(skip(self))]
    pub fn remove(&self, session_id: &str) -> ServiceResult<usize> {
        let session_id = parse_session_id(session_id)?;
        let removed = self
            .ctx
            .store()
            .remove(&HashSet::from([session_id.clone()]));

        if removed == 0 {
            return Err(DomainError::SessionNotFound(session_id.into_inner()).into());
        }

        info!(session_id = %session_id, "Session removed");

        Ok(removed)
    }

    /// Records active at `now`, most recent first
    ///
    /// Ties on `last_activity_at` are broken by session id ascending.
    pub fn list_active(&self, now: DateTime<Utc>, threshold: Duration) -> Vec<PresenceRecord> {
        let mut active: Vec<PresenceRecord> = self
            .ctx
            .store()
            .all()
            .into_iter()
            .filter(|record| is_active(record, now, threshold))
            .collect();

        active.sort_by(|a, b| {
            b.last_activity_at
                .cmp(&a.last_activity_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        active
    }

    /// Remove every record that is stale at `now`
    ///
    /// Runs under a single store write, so a record refreshed concurrently is
    /// judged on its latest value.
    pub fn purge_inactive(&self, now: DateTime<Utc>, threshold: Duration) -> usize {
        let removed = self
            .ctx
            .store()
            .remove_where(&|record: &PresenceRecord| is_stale(record, now, threshold));

        if removed > 0 {
            info!(removed, threshold_secs = threshold.num_seconds(), "Inactive sessions purged");
        } else {
            debug!("No inactive sessions to purge");
        }

        removed
    }

    /// Active visitor statistics at `now`
    pub fn summary(&self, now: DateTime<Utc>, threshold: Duration) -> PresenceSummaryResponse {
        let records = self.ctx.store().all();
        let total_tracked = records.len();

        let mut summary = PresenceSummaryResponse {
            total_tracked,
            threshold_secs: threshold.num_seconds(),
            generated_at: now,
            ..Default::default()
        };
        let mut users = HashSet::new();

        for record in records.iter().filter(|r| is_active(r, now, threshold)) {
            summary.active_count += 1;
            bump(&mut summary.by_page, record, metadata_keys::PAGE);
            bump(&mut summary.by_device, record, metadata_keys::DEVICE);
            bump(&mut summary.by_browser, record, metadata_keys::BROWSER);
            bump(&mut summary.by_os, record, metadata_keys::OS);

            if let Some(user_id) = record.user_id.as_deref().filter(|id| !id.is_empty()) {
                users.insert(user_id);
            }
        }
        summary.identified_users = users.len();

        summary
    }

    /// [`Self::list_active`] evaluated at the context clock
    pub fn list_active_now(&self, threshold: Duration) -> Vec<PresenceRecord> {
        self.list_active(self.ctx.clock().now(), threshold)
    }

    /// [`Self::purge_inactive`] evaluated at the context clock and policy
    pub fn purge_inactive_now(&self) -> usize {
        self.purge_inactive(self.ctx.clock().now(), self.ctx.policy().threshold())
    }

    /// [`Self::summary`] evaluated at the context clock
    pub fn summary_now(&self, threshold: Duration) -> PresenceSummaryResponse {
        self.summary(self.ctx.clock().now(), threshold)
    }
}

fn parse_session_id(raw: &str) -> ServiceResult<SessionId> {
    SessionId::parse(raw).map_err(|e| DomainError::from(e).into())
}

fn bump(counts: &mut BTreeMap<String, usize>, record: &PresenceRecord, key: &str) {
    let bucket = record.metadata_value(key).unwrap_or(UNKNOWN_BUCKET);
    *counts.entry(bucket.to_string()).or_default() += 1;
}
