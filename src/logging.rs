//! Logging System
//!
//! Structured logging via the `tracing` crate. Log lines go to stderr so
//! command output on stdout stays clean for piping.

use crate::error::CommandError;
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

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. `BOSUN_LOG` environment variable (full filter directives)
/// 2. `--verbose` / `--quiet` flags
/// 3. Configuration file level
pub fn init_logging(
    config: &LoggingConfig,
    verbose: bool,
    quiet: bool,
) -> Result<(), CommandError> {
    let filter = build_env_filter(config, verbose, quiet);
    let base_subscriber = Registry::default().with(filter);

    match config.format.as_str() {
        "json" => {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "text" => {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(config.color)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        other => {
            return Err(CommandError::Configuration(format!(
                "Invalid log format: {other} (must be 'json' or 'text')"
            )))
        }
    }

    Ok(())
}

/// Build the filter from the environment, verbosity flags, or config.
fn build_env_filter(config: &LoggingConfig, verbose: bool, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("BOSUN_LOG") {
        return filter;
    }

    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        config.level.as_str()
    };

    EnvFilter::new(level)
}
