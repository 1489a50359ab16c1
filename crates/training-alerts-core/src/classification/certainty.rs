//! Three-tier certainty from upstream confidence-interval widths.
//!
//! Interval bounds are computed upstream (Wilson score intervals) and only
//! their width is consumed here, relative to the feature's point estimate.

use serde::{Deserialize, Serialize};

/// Relative CI width at or below which an estimate is certain.
const CERTAIN_RELATIVE_WIDTH: f64 = 0.30;
/// Relative CI width at or above which an estimate is uncertain.
const UNCERTAIN_RELATIVE_WIDTH: f64 = 0.60;
/// Point estimates smaller than this use absolute widths instead.
const NEAR_ZERO_ESTIMATE: f64 = 1e-6;
const CERTAIN_ABSOLUTE_WIDTH: f64 = 0.01;
const UNCERTAIN_ABSOLUTE_WIDTH: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiCertainty {
    Certain,
    Intermediate,
    Uncertain,
}

/// Classify certainty from a CI width and the point estimate it brackets.
pub fn ci_certainty(ci_width: Option<f64>, point_estimate: Option<f64>) -> CiCertainty {
    let (Some(width), Some(estimate)) = (
        ci_width.filter(|w| !w.is_nan()),
        point_estimate.filter(|e| !e.is_nan()),
    ) else {
        return CiCertainty::Intermediate;
    };

    if estimate.abs() < NEAR_ZERO_ESTIMATE {
        return if width <= CERTAIN_ABSOLUTE_WIDTH {
            CiCertainty::Certain
        } else if width >= UNCERTAIN_ABSOLUTE_WIDTH {
            CiCertainty::Uncertain
        } else {
            CiCertainty::Intermediate
        };
    }

    let relative = width / estimate.abs();
    if relative <= CERTAIN_RELATIVE_WIDTH {
        CiCertainty::Certain
    } else if relative >= UNCERTAIN_RELATIVE_WIDTH {
        CiCertainty::Uncertain
    } else {
        CiCertainty::Intermediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_tiers() {
        assert_eq!(ci_certainty(Some(2.0), Some(10.0)), CiCertainty::Certain);
        assert_eq!(ci_certainty(Some(3.0), Some(10.0)), CiCertainty::Certain);
        assert_eq!(ci_certainty(Some(4.5), Some(10.0)), CiCertainty::Intermediate);
        assert_eq!(ci_certainty(Some(6.0), Some(10.0)), CiCertainty::Uncertain);
        assert_eq!(ci_certainty(Some(6.0), Some(-10.0)), CiCertainty::Uncertain);
    }

    #[test]
    fn test_near_zero_estimate_uses_absolute_width() {
        assert_eq!(ci_certainty(Some(0.005), Some(0.0)), CiCertainty::Certain);
        assert_eq!(ci_certainty(Some(0.03), Some(0.0)), CiCertainty::Intermediate);
        assert_eq!(ci_certainty(Some(0.05), Some(0.0)), CiCertainty::Uncertain);
    }

    #[test]
    fn test_missing_inputs_are_intermediate() {
        assert_eq!(ci_certainty(None, Some(1.0)), CiCertainty::Intermediate);
        assert_eq!(ci_certainty(Some(1.0), None), CiCertainty::Intermediate);
        assert_eq!(ci_certainty(Some(f64::NAN), Some(1.0)), CiCertainty::Intermediate);
    }
}
