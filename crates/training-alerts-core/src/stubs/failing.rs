//! A collaborator that always fails, for exercising degradation paths.

use crate::error::{CoreError, CoreResult};
use crate::traits::{FeaturePercentileSource, PercentileSource, SessionStore};
use crate::types::{FeaturePercentileRow, SessionPercentileRow, SessionRecord, SubjectId};

/// Every call returns `CoreError::SourceUnavailable` with this message.
#[derive(Debug, Clone)]
pub struct FailingSource {
    message: String,
}

impl FailingSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self, source_name: &str) -> CoreResult<T> {
        Err(CoreError::source_unavailable(source_name, self.message.clone()))
    }
}

impl SessionStore for FailingSource {
    fn sessions_for(&self, _subject_id: &str) -> CoreResult<Vec<SessionRecord>> {
        self.fail("session_store")
    }

    fn subject_ids(&self) -> CoreResult<Vec<SubjectId>> {
        self.fail("session_store")
    }

    fn all_sessions(&self) -> CoreResult<Vec<SessionRecord>> {
        self.fail("session_store")
    }
}

impl PercentileSource for FailingSource {
    fn session_overall_percentiles(
        &self,
        _subject_ids: Option<&[SubjectId]>,
    ) -> CoreResult<Vec<SessionPercentileRow>> {
        self.fail("percentile_source")
    }
}

impl FeaturePercentileSource for FailingSource {
    fn comprehensive_rows(&self) -> CoreResult<Vec<FeaturePercentileRow>> {
        self.fail("feature_percentile_source")
    }
}
