//! Configuration management for the alert engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::CategoryThresholds;
use crate::error::{CoreError, CoreResult};
use crate::threshold::ThresholdRuleConfig;

pub mod constants;
mod sub_configs;
pub mod validation;

pub use sub_configs::{LogFormat, LoggingConfig};
pub use validation::{validate_config, ConfigValidation};

use constants::{DEFAULT_MIN_SESSIONS, ENV_PREFIX, ENV_SELECTOR};

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertConfig {
    /// Category boundaries; a partial table merges over the defaults.
    #[serde(default)]
    pub percentile_categories: CategoryThresholds,

    /// Feature name → true when higher values are better.
    #[serde(default)]
    pub feature_config: BTreeMap<String, bool>,

    /// Sessions required before a subject can be scored.
    #[serde(default = "default_min_sessions")]
    pub min_sessions: usize,

    #[serde(default)]
    pub threshold_rules: ThresholdRuleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_min_sessions() -> usize {
    DEFAULT_MIN_SESSIONS
}

impl AlertConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{TRAINING_ALERTS_ENV}.toml (environment-specific)
    /// 3. Environment variables with TRAINING_ALERTS__ prefix
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AlertConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults.
    pub fn default_config() -> Self {
        Self {
            percentile_categories: CategoryThresholds::default(),
            feature_config: BTreeMap::new(),
            min_sessions: default_min_sessions(),
            threshold_rules: ThresholdRuleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: AlertConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserialize a JSON override document, merged over the defaults.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<Self> {
        let config: AlertConfig = serde_json::from_value(value.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Out-of-order category bounds are not rejected here;
    /// [`validate_config`] reports them as a warning.
    pub fn validate(&self) -> CoreResult<()> {
        if self.min_sessions == 0 {
            return Err(CoreError::ConfigError(
                "min_sessions must be greater than 0".into(),
            ));
        }

        let bounds = self.percentile_categories.as_array();
        if let Some(idx) = bounds.iter().position(|b| !b.is_finite()) {
            return Err(CoreError::ConfigError(format!(
                "percentile_categories.{} must be a finite number",
                crate::classification::CATEGORY_KEYS[idx]
            )));
        }

        self.threshold_rules.validate()
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
