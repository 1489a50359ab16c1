//! Externally computed percentile data.

use crate::error::CoreResult;
use crate::types::{FeaturePercentileRow, SessionPercentileRow, SubjectId};

/// Most-recent-session percentiles per subject.
pub trait PercentileSource: Send + Sync {
    /// Rows for `subject_ids`, or for every subject when `None`.
    ///
    /// Subjects without percentile data may be omitted.
    fn session_overall_percentiles(
        &self,
        subject_ids: Option<&[SubjectId]>,
    ) -> CoreResult<Vec<SessionPercentileRow>>;
}

/// Comprehensive per-strata feature percentiles.
pub trait FeaturePercentileSource: Send + Sync {
    /// Every row, current and historical strata alike.
    fn comprehensive_rows(&self) -> CoreResult<Vec<FeaturePercentileRow>>;
}
