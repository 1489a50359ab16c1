//! Collaborator trait definitions.
//!
//! The engine never ingests or computes percentiles itself; it consumes
//! these capabilities. In-memory implementations live in [`crate::stubs`].

mod off_curriculum;
mod percentile_source;
mod session_store;
mod sources;

pub use off_curriculum::OffCurriculumRegistry;
pub use percentile_source::{FeaturePercentileSource, PercentileSource};
pub use session_store::SessionStore;
pub use sources::AlertSources;
