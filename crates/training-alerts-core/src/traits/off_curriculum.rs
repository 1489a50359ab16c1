//! Off-curriculum bookkeeping supplied by ingestion.

use crate::types::{OffCurriculumEntry, SubjectId};

/// Read-only map of subjects with off-curriculum sessions.
pub trait OffCurriculumRegistry: Send + Sync {
    fn entry(&self, subject_id: &str) -> Option<OffCurriculumEntry>;

    fn subject_ids(&self) -> Vec<SubjectId>;

    fn contains(&self, subject_id: &str) -> bool {
        self.entry(subject_id).is_some()
    }
}
