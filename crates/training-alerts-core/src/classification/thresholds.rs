//! Percentile category boundaries.
//!
//! Five ascending upper bounds keyed SB < B < N < G < SG. SG is nominally
//! 100 and open-ended: any percentile at or above G classifies as SG.
//!
//! # Defaults
//!
//! - SB = 6.5  (about -2.75 std dev)
//! - B  = 28   (about -0.25 std dev)
//! - N  = 72   (about +0.25 std dev)
//! - G  = 93.5 (about +2.75 std dev)
//! - SG = 100

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::constants::{
    DEFAULT_BELOW_BOUND, DEFAULT_GOOD_BOUND, DEFAULT_NORMAL_BOUND,
    DEFAULT_SIGNIFICANTLY_BELOW_BOUND, DEFAULT_SIGNIFICANTLY_GOOD_BOUND,
};

/// Category keys in ascending boundary order.
pub const CATEGORY_KEYS: [&str; 5] = ["SB", "B", "N", "G", "SG"];

/// Percentile category boundaries.
///
/// Missing keys in a partial config fall back to the defaults, so
/// deserializing an override table merges it over the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    #[serde(rename = "SB", default = "default_sb")]
    pub significantly_below: f64,
    #[serde(rename = "B", default = "default_b")]
    pub below: f64,
    #[serde(rename = "N", default = "default_n")]
    pub normal: f64,
    #[serde(rename = "G", default = "default_g")]
    pub good: f64,
    #[serde(rename = "SG", default = "default_sg")]
    pub significantly_good: f64,
}

fn default_sb() -> f64 {
    DEFAULT_SIGNIFICANTLY_BELOW_BOUND
}

fn default_b() -> f64 {
    DEFAULT_BELOW_BOUND
}

fn default_n() -> f64 {
    DEFAULT_NORMAL_BOUND
}

fn default_g() -> f64 {
    DEFAULT_GOOD_BOUND
}

fn default_sg() -> f64 {
    DEFAULT_SIGNIFICANTLY_GOOD_BOUND
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            significantly_below: default_sb(),
            below: default_b(),
            normal: default_n(),
            good: default_g(),
            significantly_good: default_sg(),
        }
    }
}

impl CategoryThresholds {
    /// Bounds in `CATEGORY_KEYS` order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.significantly_below,
            self.below,
            self.normal,
            self.good,
            self.significantly_good,
        ]
    }

    /// Bound for a category key, if the key is known.
    pub fn get(&self, key: &str) -> Option<f64> {
        CATEGORY_KEYS
            .iter()
            .position(|k| *k == key)
            .map(|idx| self.as_array()[idx])
    }

    /// True when SB < B < N < G < SG.
    ///
    /// Not enforced at construction; callers surface a warning instead.
    pub fn is_strictly_ascending(&self) -> bool {
        self.as_array().windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Merge key-by-key overrides over these bounds. Unknown keys are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, f64>) -> Self {
        for (key, value) in overrides {
            match key.as_str() {
                "SB" => self.significantly_below = *value,
                "B" => self.below = *value,
                "N" => self.normal = *value,
                "G" => self.good = *value,
                "SG" => self.significantly_good = *value,
                other => warn!(key = other, "Ignoring unknown percentile category override"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_boundaries() {
        let t = CategoryThresholds::default();
        assert_eq!(t.as_array(), [6.5, 28.0, 72.0, 93.5, 100.0]);
        assert!(t.is_strictly_ascending());
    }

    #[test]
    fn test_partial_override_merges_over_defaults() {
        let t: CategoryThresholds = serde_json::from_str(r#"{"SB": 5.0, "G": 90.0}"#).unwrap();
        assert_eq!(t.significantly_below, 5.0);
        assert_eq!(t.below, 28.0);
        assert_eq!(t.good, 90.0);
        assert_eq!(t.significantly_good, 100.0);
    }

    #[test]
    fn test_with_overrides_ignores_unknown_keys() {
        let mut overrides = BTreeMap::new();
        overrides.insert("N".to_string(), 70.0);
        overrides.insert("X".to_string(), 1.0);
        let t = CategoryThresholds::default().with_overrides(&overrides);
        assert_eq!(t.normal, 70.0);
        assert_eq!(t.get("N"), Some(70.0));
        assert_eq!(t.get("X"), None);
    }

    #[test]
    fn test_out_of_order_bounds_detected() {
        let t = CategoryThresholds {
            below: 80.0,
            ..CategoryThresholds::default()
        };
        assert!(!t.is_strictly_ascending());
    }
}
