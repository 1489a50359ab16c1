//! In-memory collaborator implementations.
//!
//! Used by tests and by hosts that already hold their tables in memory.

mod failing;
mod feature_source;
mod off_curriculum;
mod percentile_source;
mod session_store;

pub use failing::FailingSource;
pub use feature_source::InMemoryFeatureSource;
pub use off_curriculum::InMemoryOffCurriculum;
pub use percentile_source::InMemoryPercentileSource;
pub use session_store::InMemorySessionStore;
