//! Shared test fixtures for training-alerts crates.
//!
//! - `fixtures`: session records and subject histories
//! - `population`: seeded synthetic populations wired into `AlertSources`

pub mod fixtures;
pub mod population;

pub use fixtures::{history, staged_history, SessionBuilder};
pub use population::{PopulationBuilder, SyntheticPopulation};
