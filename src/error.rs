//! Error types for the test harness

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Server failed to start: {0}")]
    ServerStartup(String),

    #[error("Server did not announce readiness within {waited:?}")]
    StartupTimeout { waited: Duration },

    #[error("Server exited before announcing readiness ({status})")]
    ServerExited { status: ExitStatus },

    #[error("Suite spec parse error: {0}")]
    SpecParse(String),

    #[error("Check failed: {check} - {reason}")]
    CheckFailed { check: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type FixtureResult<T> = Result<T, FixtureError>;
