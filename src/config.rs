//! Harness configuration

use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for spawning the app server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interpreter that runs the server entry point
    pub interpreter: PathBuf,

    /// Path to the server entry point, passed as the only argument
    pub script: PathBuf,

    /// Bound on the wait for the startup announcement
    pub startup_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python"),
            script: PathBuf::from("server/python/server.py"),
            startup_timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub server: ServerConfig,

    /// Directory holding YAML suite specs
    pub specs_dir: PathBuf,

    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            specs_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Logging knobs for the harness
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Print debug output regardless of the configured level
    pub verbose: bool,

    /// Base log level
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            level: LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}
