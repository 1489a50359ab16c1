//! In-memory session table.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::CoreResult;
use crate::traits::SessionStore;
use crate::types::{SessionRecord, SubjectId};

/// Session table held in memory.
///
/// # Thread Safety
///
/// Clones share the same table via `Arc<RwLock<_>>`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    records: Arc<RwLock<Vec<SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn insert(&self, record: SessionRecord) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn sessions_for(&self, subject_id: &str) -> CoreResult<Vec<SessionRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| record.subject_id == subject_id)
            .cloned()
            .collect())
    }

    fn subject_ids(&self) -> CoreResult<Vec<SubjectId>> {
        let ids: BTreeSet<SubjectId> = self
            .records
            .read()
            .iter()
            .map(|record| record.subject_id.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    fn all_sessions(&self) -> CoreResult<Vec<SessionRecord>> {
        Ok(self.records.read().clone())
    }
}
