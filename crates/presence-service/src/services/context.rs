//! Service context - dependency container for services
//!
//! Holds the presence store, the clock, and the expiry policy. One context is
//! built per process and shared by every handler and background task.

use std::sync::Arc;

use chrono::Duration;
use presence_common::PresenceConfig;
use presence_core::{
    Clock, ExpiryPolicy, PresenceStore, SharedClock, SharedPresenceStore, SystemClock,
};
use presence_store::InMemoryPresenceStore;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: SharedPresenceStore,
    clock: SharedClock,
    policy: ExpiryPolicy,
    /// Largest threshold a caller may ask for
    max_threshold: Duration,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        store: SharedPresenceStore,
        clock: SharedClock,
        policy: ExpiryPolicy,
        max_threshold: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
            max_threshold,
        }
    }

    /// Get the presence store
    pub fn store(&self) -> &dyn PresenceStore {
        self.store.as_ref()
    }

    /// Get the clock
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Get the configured expiry policy
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Resolve an optional per-request threshold override (seconds)
    pub fn resolve_threshold(&self, override_secs: Option<u64>) -> ServiceResult<Duration> {
        let Some(secs) = override_secs else {
            return Ok(self.policy.threshold());
        };

        let threshold = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .filter(|t| *t <= self.max_threshold)
            .ok_or_else(|| {
                ServiceError::validation(format!(
                    "thresholdSecs must be at most {}",
                    self.max_threshold.num_seconds()
                ))
            })?;

        Ok(threshold)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"PresenceStore")
            .field("clock", &"Clock")
            .field("policy", &self.policy)
            .field("max_threshold", &self.max_threshold)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<SharedPresenceStore>,
    clock: Option<SharedClock>,
    policy: Option<ExpiryPolicy>,
    max_threshold: Option<Duration>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: SharedPresenceStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn max_threshold(mut self, max_threshold: Duration) -> Self {
        self.max_threshold = Some(max_threshold);
        self
    }

    /// Apply the presence section of the application config
    pub fn presence_config(self, config: &PresenceConfig) -> Self {
        self.policy(ExpiryPolicy::new(config.inactivity_threshold()))
            .max_threshold(config.max_threshold())
    }

    /// Build the context
    ///
    /// Missing pieces fall back to an in-memory store, the system clock and
    /// the default policy.
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let policy = self.policy.unwrap_or_default();
        let max_threshold = self.max_threshold.unwrap_or_else(|| policy.threshold());

        if policy.threshold() < Duration::zero() {
            return Err(ServiceError::validation("inactivity threshold must not be negative"));
        }
        if max_threshold < policy.threshold() {
            return Err(ServiceError::validation(
                "max threshold must not be below the inactivity threshold",
            ));
        }

        Ok(ServiceContext::new(
            self.store
                .unwrap_or_else(|| InMemoryPresenceStore::new_shared() as SharedPresenceStore),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock) as SharedClock),
            policy,
            max_threshold,
        ))
    }
}
