//! Lock-guarded in-memory presence store.
//!
//! A single `RwLock` around the whole map keeps `all()` a consistent
//! snapshot and makes bulk removal atomic.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use presence_core::{PresenceRecord, PresenceStore, SessionId};

/// In-memory presence store
#[derive(Debug, Default)]
pub struct InMemoryPresenceStore {
    records: RwLock<HashMap<SessionId, PresenceRecord>>,
}

impl InMemoryPresenceStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl PresenceStore for InMemoryPresenceStore {
    fn upsert(&self, record: PresenceRecord) -> PresenceRecord {
        self.records
            .write()
            .insert(record.session_id.clone(), record.clone());

        tracing::trace!(session_id = %record.session_id, "Presence record stored");

        record
    }

    fn upsert_with(
        &self,
        session_id: &SessionId,
        change: &mut dyn FnMut(Option<&PresenceRecord>) -> Option<PresenceRecord>,
    ) -> Option<PresenceRecord> {
        let mut records = self.records.write();
        let replacement = change(records.get(session_id.as_str()))?;
        records.insert(session_id.clone(), replacement.clone());
        Some(replacement)
    }

    fn get(&self, session_id: &str) -> Option<PresenceRecord> {
        self.records.read().get(session_id).cloned()
    }

    fn all(&self) -> Vec<PresenceRecord> {
        self.records.read().values().cloned().collect()
    }

    fn remove(&self, session_ids: &HashSet<SessionId>) -> usize {
        let mut records = self.records.write();
        let removed = session_ids
            .iter()
            .filter(|id| records.remove(id.as_str()).is_some())
            .count();

        if removed > 0 {
            tracing::trace!(removed, "Presence records removed");
        }

        removed
    }

    fn remove_where(&self, predicate: &dyn Fn(&PresenceRecord) -> bool) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| !predicate(record));
        before - records.len()
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}
