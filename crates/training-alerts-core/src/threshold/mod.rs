//! Threshold rules over raw session metrics.
//!
//! Three fixed rules (total sessions, sessions in the current stage, daily
//! water volume) are evaluated in one pass. A subject's aggregate flag is
//! `T` iff at least one rule fired.

mod engine;
mod rules;

pub use engine::ThresholdRuleEngine;
pub use rules::{ThresholdRule, ThresholdRuleConfig};
