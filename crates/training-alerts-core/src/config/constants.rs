//! Default values for alert configuration.
//!
//! These mirror the dashboard's established bounds and MUST stay in sync
//! with the values users see in the alert legend.

// =============================================================================
// Percentile category boundaries
// =============================================================================

pub const DEFAULT_SIGNIFICANTLY_BELOW_BOUND: f64 = 6.5;
pub const DEFAULT_BELOW_BOUND: f64 = 28.0;
pub const DEFAULT_NORMAL_BOUND: f64 = 72.0;
pub const DEFAULT_GOOD_BOUND: f64 = 93.5;
pub const DEFAULT_SIGNIFICANTLY_GOOD_BOUND: f64 = 100.0;

// =============================================================================
// Scoring eligibility
// =============================================================================

/// Minimum sessions before a subject can be scored.
pub const DEFAULT_MIN_SESSIONS: usize = 1;

// =============================================================================
// Threshold rules
// =============================================================================

/// Total sessions above which a subject is flagged.
pub const DEFAULT_TOTAL_SESSIONS_LIMIT: u32 = 40;

/// Daily water volume (ml) above which a subject is flagged.
pub const DEFAULT_WATER_DAY_TOTAL_LIMIT: f64 = 3.5;

/// Sessions allowed in each curriculum stage before a subject is flagged.
pub const DEFAULT_STAGE_SESSION_LIMITS: [(&str, u32); 6] = [
    ("STAGE_1", 5),
    ("STAGE_2", 5),
    ("STAGE_3", 6),
    ("STAGE_4", 10),
    ("STAGE_FINAL", 10),
    ("GRADUATED", 20),
];

// =============================================================================
// Environment
// =============================================================================

/// Environment variable selecting the config overlay file.
pub const ENV_SELECTOR: &str = "TRAINING_ALERTS_ENV";

/// Prefix for environment variable overrides (`TRAINING_ALERTS__MIN_SESSIONS`).
pub const ENV_PREFIX: &str = "TRAINING_ALERTS";
