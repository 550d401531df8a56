//! Logging System
//!
//! Structured logging via the `tracing` crate. Level and format come from
//! configuration with environment overrides (`DEVFORGE_LOG`,
//! `DEVFORGE_LOG_FORMAT`); CLI flags take precedence over both.

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
        }
    }
}

/// Initialize the logging system.
///
/// Precedence, highest first: `DEVFORGE_LOG` env filter, the supplied
/// configuration, defaults. Logs go to stderr so generated artifacts can be
/// piped from stdout cleanly.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), GenerateError> {
    let filter = build_env_filter(config)?;
    let format = config
        .map(|c| c.format.clone())
        .or_else(|| std::env::var("DEVFORGE_LOG_FORMAT").ok())
        .unwrap_or_else(default_format);

    let base = Registry::default().with(filter);

    let result = match format.as_str() {
        "json" => base
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        "text" => base
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        other => {
            return Err(GenerateError::ConfigError(format!(
                "Unknown log format '{}'. Expected: json, text",
                other
            )))
        }
    };

    // A second init (tests, library embedding) is not an error.
    let _ = result;
    Ok(())
}

fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, GenerateError> {
    if let Ok(env_directive) = std::env::var("DEVFORGE_LOG") {
        return EnvFilter::try_new(&env_directive).map_err(|e| {
            GenerateError::ConfigError(format!("Invalid DEVFORGE_LOG filter: {}", e))
        });
    }

    let level = config
        .map(|c| c.level.as_str())
        .unwrap_or("warn");
    EnvFilter::try_new(level)
        .map_err(|e| GenerateError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}
