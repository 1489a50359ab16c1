//! Training Alerts Core Library
//!
//! Classifies subjects in a behavioral-training population and unifies
//! several alert signals into one alert per subject.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`SessionRecord`, `QuantileRecord`, `ThresholdRecord`, `UnifiedAlert`, etc.)
//! - Collaborator traits (`SessionStore`, `PercentileSource`, `FeaturePercentileSource`,
//!   `OffCurriculumRegistry`) and in-memory stubs
//! - Percentile classification and not-scored diagnostics
//! - Threshold rules over session history
//! - Unification with a single-slot result cache
//! - The `AlertQueryFacade` used by dashboard code
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use training_alerts_core::stubs::InMemoryPercentileSource;
//! use training_alerts_core::types::{AlertCategory, SessionPercentileRow};
//! use training_alerts_core::{AlertConfig, AlertQueryFacade, AlertSources};
//!
//! let percentiles = InMemoryPercentileSource::new([SessionPercentileRow::new("m1", Some(80.0))]);
//! let facade = AlertQueryFacade::new(AlertSources::new().with_percentiles(Arc::new(percentiles)));
//! facade.initialize(AlertConfig::default_config()).unwrap();
//!
//! let alerts = facade.get_unified_alerts(None, true).unwrap();
//! assert_eq!(alerts["m1"].alert_category, AlertCategory::Good);
//! ```

pub mod cache;
pub mod classification;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod facade;
pub mod logging;
pub mod quantile;
pub mod stubs;
pub mod threshold;
pub mod traits;
pub mod types;
pub mod unify;

// Re-exports for convenience
pub use classification::{CategoryThresholds, PercentileClassifier};
pub use config::AlertConfig;
pub use error::{CoreError, CoreResult};
pub use facade::{AlertQueryFacade, AlertSummary, CategoryCounts};
pub use logging::init_tracing;
pub use traits::{
    AlertSources, FeaturePercentileSource, OffCurriculumRegistry, PercentileSource, SessionStore,
};
pub use types::{
    AlertCategory, AlertFlag, AlertTableRow, QuantileRecord, SessionRecord, SubjectId,
    ThresholdRecord, UnifiedAlert, UnifiedAlertMap,
};
