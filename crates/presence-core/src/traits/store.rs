//! Presence store trait - exclusive owner of the presence records
//!
//! Implementations must make every method linearizable with respect to the
//! others. A value is only ever swapped in whole; no caller can observe a
//! half-written record.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::PresenceRecord;
use crate::value_objects::SessionId;

/// Shared handle to a presence store
pub type SharedPresenceStore = Arc<dyn PresenceStore>;

pub trait PresenceStore: Send + Sync {
    /// Insert or replace the record keyed by its session ID
    fn upsert(&self, record: PresenceRecord) -> PresenceRecord;

    /// Atomically read-modify-write a single record
    ///
    /// `change` sees the current value (if any). Returning `Some` replaces it
    /// and the stored value is returned; returning `None` leaves the store
    /// untouched and `None` is returned.
    fn upsert_with(
        &self,
        session_id: &SessionId,
        change: &mut dyn FnMut(Option<&PresenceRecord>) -> Option<PresenceRecord>,
    ) -> Option<PresenceRecord>;

    /// Find a record by session ID
    fn get(&self, session_id: &str) -> Option<PresenceRecord>;

    /// Snapshot of every stored record, active or stale
    fn all(&self) -> Vec<PresenceRecord>;

    /// Delete the given sessions, returning how many existed
    fn remove(&self, session_ids: &HashSet<SessionId>) -> usize;

    /// Atomically delete every record matching `predicate`
    fn remove_where(&self, predicate: &dyn Fn(&PresenceRecord) -> bool) -> usize;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
