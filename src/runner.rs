//! Test runner orchestrating the server fixture and suite checks

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::{RunnerConfig, ServerConfig};
use crate::error::{FixtureError, FixtureResult};
use crate::server::ServerHandle;
use crate::spec::{HttpCheck, SuiteSpec};

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running all suites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<CheckResult>,
}

/// Main test runner
///
/// Owns the single server fixture for the suite run; checks take the
/// discovered endpoint from it rather than from ambient state.
pub struct TestRunner {
    /// Server configuration
    server_config: ServerConfig,

    /// Running server handle (if any)
    server: Option<ServerHandle>,

    /// Suite specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,

    client: reqwest::Client,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            server_config: config.server,
            server: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
            client: reqwest::Client::new(),
        }
    }

    /// Start the server fixture
    pub async fn start_server(&mut self) -> FixtureResult<()> {
        if self.server.is_some() {
            return Ok(()); // Already running
        }

        let server = ServerHandle::spawn(self.server_config.clone()).await?;
        self.server = Some(server);
        Ok(())
    }

    /// Stop the server fixture and wait until it is confirmed dead
    pub async fn stop_server(&mut self) -> FixtureResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop().await?;
        }
        Ok(())
    }

    /// Endpoint announced by the running server
    pub fn base_url(&self) -> Option<&str> {
        self.server.as_ref().map(|s| s.base_url())
    }

    /// Run all suites in the specs directory
    pub async fn run_all(&mut self) -> FixtureResult<SuiteResult> {
        let specs = SuiteSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run a single suite by name
    pub async fn run_suite(&mut self, name: &str) -> FixtureResult<SuiteResult> {
        let specs = SuiteSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| FixtureError::SpecParse(format!("Suite not found: {}", name)))?;

        self.run_specs(&[spec]).await
    }

    /// Run only suites matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> FixtureResult<SuiteResult> {
        let specs = SuiteSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<SuiteSpec> = specs
            .into_iter()
            .filter(|s| s.tags.contains(&tag.to_string()))
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a list of suite specs
    pub async fn run_specs(&mut self, specs: &[SuiteSpec]) -> FixtureResult<SuiteResult> {
        let start = Instant::now();

        // Ensure server is running
        self.start_server().await?;

        let total: usize = specs.iter().map(|s| s.checks.len()).sum();
        info!("Running {} check(s) across {} suite(s)...", total, specs.len());

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        for spec in specs {
            debug!("Running suite: {}", spec.name);
            for check in &spec.checks {
                let result = self.run_check(check).await;
                if result.success {
                    passed += 1;
                    info!("✓ {} ({} ms)", result.name, result.duration_ms);
                } else {
                    failed += 1;
                    error!(
                        "✗ {} - {}",
                        result.name,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
                results.push(result);
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            total,
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Run one check against the discovered endpoint
    pub async fn run_check(&self, check: &HttpCheck) -> CheckResult {
        let start = Instant::now();
        let outcome = self.execute_check(check).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => CheckResult {
                name: check.name.clone(),
                success: true,
                duration_ms,
                error: None,
            },
            Err(e) => CheckResult {
                name: check.name.clone(),
                success: false,
                duration_ms,
                error: Some(e.to_string()),
            },
        }
    }

    async fn execute_check(&self, check: &HttpCheck) -> FixtureResult<()> {
        let base = self.base_url().ok_or_else(|| FixtureError::CheckFailed {
            check: check.name.clone(),
            reason: "server is not running".to_string(),
        })?;

        let url = format!("{}{}", base.trim_end_matches('/'), check.path);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status().as_u16();
        if status != check.expect_status {
            return Err(FixtureError::CheckFailed {
                check: check.name.clone(),
                reason: format!("expected status {}, got {}", check.expect_status, status),
            });
        }

        let body = resp.text().await?;
        if let Some(expected) = &check.body_equals {
            if &body != expected {
                return Err(FixtureError::CheckFailed {
                    check: check.name.clone(),
                    reason: format!("expected body {:?}, got {:?}", expected, body),
                });
            }
        }
        if let Some(needle) = &check.body_contains {
            if !body.contains(needle.as_str()) {
                return Err(FixtureError::CheckFailed {
                    check: check.name.clone(),
                    reason: format!("body does not contain {:?}", needle),
                });
            }
        }

        Ok(())
    }

    /// Write suite results to a JSON file
    pub fn write_results(&self, results: &SuiteResult) -> FixtureResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("check-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
