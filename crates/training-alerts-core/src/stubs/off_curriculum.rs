//! In-memory off-curriculum registry.

use std::collections::BTreeMap;

use crate::traits::OffCurriculumRegistry;
use crate::types::{OffCurriculumEntry, SessionRecord, SubjectId};

#[derive(Debug, Clone, Default)]
pub struct InMemoryOffCurriculum {
    entries: BTreeMap<SubjectId, OffCurriculumEntry>,
}

impl InMemoryOffCurriculum {
    pub fn new(entries: BTreeMap<SubjectId, OffCurriculumEntry>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, subject_id: impl Into<SubjectId>, entry: OffCurriculumEntry) {
        self.entries.insert(subject_id.into(), entry);
    }

    /// Build the registry the way ingestion does: a subject is listed when
    /// any of its sessions lacks a curriculum name, stage or version.
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for record in sessions {
            *totals.entry(record.subject_id.as_str()).or_default() += 1;
        }

        let mut entries: BTreeMap<SubjectId, OffCurriculumEntry> = BTreeMap::new();
        for record in sessions.iter().filter(|record| record.is_off_curriculum()) {
            let entry = entries
                .entry(record.subject_id.clone())
                .or_insert_with(|| OffCurriculumEntry {
                    count: 0,
                    total_sessions: totals.get(record.subject_id.as_str()).copied().unwrap_or(0),
                    latest_date: None,
                });
            entry.count += 1;
            entry.latest_date = entry.latest_date.max(Some(record.session_date));
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OffCurriculumRegistry for InMemoryOffCurriculum {
    fn entry(&self, subject_id: &str) -> Option<OffCurriculumEntry> {
        self.entries.get(subject_id).cloned()
    }

    fn subject_ids(&self) -> Vec<SubjectId> {
        self.entries.keys().cloned().collect()
    }
}
