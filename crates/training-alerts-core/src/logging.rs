//! Tracing subscriber setup.

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CoreError, CoreResult};

/// Build the event filter. `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &LoggingConfig) -> CoreResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            CoreError::ConfigError(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once: if a subscriber is already installed the
/// call is a no-op.
///
/// # Errors
///
/// Returns `CoreError::ConfigError` if the configured level is not a valid
/// filter directive.
pub fn init_tracing(config: &LoggingConfig) -> CoreResult<()> {
    let filter = env_filter(config)?;
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(e) = installed {
        debug!(error = %e, "Tracing subscriber already installed");
    }
    Ok(())
}
