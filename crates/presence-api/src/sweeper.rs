//! Background sweeper
//!
//! Periodically purges inactive sessions so stale records do not pile up
//! between explicit purge calls.

use std::sync::Arc;
use std::time::Duration;

use presence_service::{RegistryService, ServiceContext};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Spawn the sweeper task
///
/// The first sweep runs one full `interval` after spawning. Abort the
/// returned handle to stop it.
pub fn spawn_sweeper(context: Arc<ServiceContext>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Presence sweeper started");

    tokio::spawn(async move {
        let Some(start) = tokio::time::Instant::now().checked_add(interval) else {
            error!(interval_secs = interval.as_secs(), "Sweep interval out of range, sweeper stopped");
            return;
        };
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = RegistryService::new(&context).purge_inactive_now();
            debug!(removed, remaining = context.store().len(), "Sweep finished");
        }
    })
}
