//! Unified alerts: one authoritative record per subject.
//!
//! Merges quantile records, threshold records, off-curriculum status and
//! feature-level enrichment under a fixed precedence:
//!
//! 1. off-curriculum subjects are NS and nothing else applies
//! 2. quantile and/or threshold records are merged
//! 3. current-strata feature percentiles are attached; their mean becomes
//!    the candidate overall percentile
//! 4. the overall percentile resolves to the enrichment mean, else the
//!    session-level overall, else NS with a reason
//! 5. remaining subjects get an NS stub

mod enrichment;
#[cfg(test)]
mod tests;
mod unifier;

pub use enrichment::{collect_enrichment, FeatureEnrichment};
pub use unifier::{AlertUnifier, UnifyInputs};
