//! Percentile classification.
//!
//! - `thresholds`: configurable category boundaries
//! - `classifier`: percentile → category mapping
//! - `certainty`: CI-width certainty tiers for feature estimates

mod certainty;
mod classifier;
mod thresholds;

pub use certainty::{ci_certainty, CiCertainty};
pub use classifier::{classify, PercentileClassifier};
pub use thresholds::{CategoryThresholds, CATEGORY_KEYS};
