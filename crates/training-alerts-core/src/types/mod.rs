//! Core domain types: categories, session inputs, alert records, table rows.

mod category;
mod percentile;
mod records;
mod session;
mod table;

pub use category::{AlertCategory, AlertFlag, CategoryFilter};
pub use percentile::{FeaturePercentileRow, SessionPercentileRow, TRACKED_FEATURES};
pub use records::{
    FeaturePercentile, FeatureScore, QuantileRecord, RuleAlert, ThresholdRecord, UnifiedAlert,
    UnifiedAlertMap, UNKNOWN_STRATA,
};
pub use session::{most_recent, OffCurriculumEntry, SessionRecord, SubjectId};
pub use table::AlertTableRow;
