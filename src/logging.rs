//! Logging initialization
//!
//! Verbosity follows the `{verbose, log_level}` knobs: `verbose` floors
//! the filter at `debug`, and `RUST_LOG` overrides both when set.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogLevel};

/// Initialize the global tracing subscriber from the logging knobs
///
/// Must be called at most once per process.
pub fn init(config: &LogConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(effective_level(config).as_str())),
        )
        .with_target(false)
        .init();
}

fn effective_level(config: &LogConfig) -> LogLevel {
    if config.verbose {
        LogLevel::Debug
    } else {
        config.level
    }
}
