//! Session history access.

use crate::error::CoreResult;
use crate::types::{SessionRecord, SubjectId};

/// Read access to cleaned session history.
pub trait SessionStore: Send + Sync {
    /// All sessions for one subject, in any order. Unknown subjects yield
    /// an empty vector, not an error.
    fn sessions_for(&self, subject_id: &str) -> CoreResult<Vec<SessionRecord>>;

    /// Every subject in the working population.
    fn subject_ids(&self) -> CoreResult<Vec<SubjectId>>;

    /// The whole session table.
    fn all_sessions(&self) -> CoreResult<Vec<SessionRecord>>;
}
