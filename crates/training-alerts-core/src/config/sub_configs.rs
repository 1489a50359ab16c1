//! Sub-configuration structures.

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "training_alerts_core=debug"
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Include the event target (module path) in output
    #[serde(default)]
    pub include_target: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            include_target: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info", "Default log level must be info");
        assert_eq!(logging.format, LogFormat::Pretty);
        assert!(!logging.include_target);
    }

    #[test]
    fn test_log_format_serialization() {
        let formats = [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json];
        let expected = ["pretty", "compact", "json"];

        for (format, expected_str) in formats.iter().zip(expected.iter()) {
            let json = serde_json::to_string(format).expect("LogFormat must serialize");
            assert_eq!(json, format!("\"{}\"", expected_str));
        }
    }
}
