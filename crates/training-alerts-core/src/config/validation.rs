//! Validation of raw, user-supplied alert configuration.
//!
//! Unlike [`AlertConfig::validate`](super::AlertConfig::validate), this works
//! on the untyped JSON shape so it can report every problem at once instead
//! of failing on the first deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classification::CATEGORY_KEYS;

/// Result of validating a raw configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValidation {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
        self.valid = false;
    }

    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validate a raw configuration value.
///
/// # Rules
///
/// - `percentile_categories`, when present, must contain all of SB, B, N, G, SG
///   with numeric values (errors), in non-decreasing order (warning).
/// - `feature_config`, when present, must be an object (error).
/// - `min_sessions`, when present, must be a non-negative integer (error).
pub fn validate_config(config: &Value) -> ConfigValidation {
    let mut result = ConfigValidation::new();

    if let Some(categories) = config.get("percentile_categories") {
        validate_categories(categories, &mut result);
    }

    if let Some(feature_config) = config.get("feature_config") {
        if !feature_config.is_object() {
            result.error("feature_config must be a dictionary".to_string());
        }
    }

    if let Some(min_sessions) = config.get("min_sessions") {
        if min_sessions.as_u64().is_none() {
            result.error("min_sessions must be a non-negative integer".to_string());
        }
    }

    result
}

fn validate_categories(categories: &Value, result: &mut ConfigValidation) {
    let Some(table) = categories.as_object() else {
        result.error("percentile_categories must be a dictionary".to_string());
        return;
    };

    let mut bounds = Vec::with_capacity(CATEGORY_KEYS.len());
    let mut keys_ok = true;
    for key in CATEGORY_KEYS {
        match table.get(key) {
            None => {
                result.error(format!("Missing category threshold: {}", key));
                keys_ok = false;
            }
            Some(value) => match value.as_f64() {
                Some(bound) => bounds.push(bound),
                None => {
                    result.error(format!("Invalid threshold type for {}: must be numeric", key));
                    keys_ok = false;
                }
            },
        }
    }

    if keys_ok && !bounds.windows(2).all(|pair| pair[0] <= pair[1]) {
        result.warning("Category thresholds may not be in expected order".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_config() {
        let result = validate_config(&json!({
            "percentile_categories": {"SB": 6.5, "B": 28, "N": 72, "G": 93.5, "SG": 100},
            "feature_config": {"finished_trials": true},
            "min_sessions": 5
        }));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_and_mistyped_keys_are_errors() {
        let result = validate_config(&json!({
            "percentile_categories": {"SB": 6.5, "B": "low", "N": 72, "G": 93.5}
        }));
        assert!(!result.valid);
        assert!(result.errors.contains(&"Missing category threshold: SG".to_string()));
        assert!(result
            .errors
            .contains(&"Invalid threshold type for B: must be numeric".to_string()));
        assert!(result.warnings.is_empty(), "ordering is not checked when keys are invalid");
    }

    #[test]
    fn test_out_of_order_is_warning_only() {
        let result = validate_config(&json!({
            "percentile_categories": {"SB": 30, "B": 28, "N": 72, "G": 93.5, "SG": 100}
        }));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_equal_bounds_do_not_warn() {
        let result = validate_config(&json!({
            "percentile_categories": {"SB": 28, "B": 28, "N": 72, "G": 93.5, "SG": 100}
        }));
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_feature_config_must_be_object() {
        let result = validate_config(&json!({"feature_config": ["finished_trials"]}));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["feature_config must be a dictionary".to_string()]);
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&json!({})).valid);
    }
}
