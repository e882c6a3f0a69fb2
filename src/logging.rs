//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured `application.log_level`
//! is used for every target.

use tracing_subscriber::EnvFilter;

use crate::config::ApplicationConfig;
use crate::error::{AppResult, DaqError};

/// Build the filter used by [`init_from_config`].
pub fn env_filter(config: &ApplicationConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global `fmt` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_from_config(config: &ApplicationConfig) -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .try_init()
        .map_err(|e| DaqError::Logging(e.to_string()))?;

    tracing::info!(application = %config.name, level = %config.log_level, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back_to_configured_level() {
        let config = ApplicationConfig {
            name: "test".to_string(),
            log_level: "debug".to_string(),
        };
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter(&config).to_string(), "debug");
        }
    }
}
