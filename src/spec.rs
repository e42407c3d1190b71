//! Declarative YAML suite specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FixtureError, FixtureResult};

/// A suite of checks parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSpec {
    /// Unique name for this suite
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering suites
    #[serde(default)]
    pub tags: Vec<String>,

    /// Checks to run in order
    pub checks: Vec<HttpCheck>,
}

/// A single HTTP check against the discovered endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCheck {
    /// Unique name for this check
    pub name: String,

    /// Request path, relative to the announced endpoint
    pub path: String,

    /// Expected response status
    #[serde(default = "default_status")]
    pub expect_status: u16,

    /// Exact body the response must carry
    #[serde(default)]
    pub body_equals: Option<String>,

    /// Substring the body must contain
    #[serde(default)]
    pub body_contains: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl SuiteSpec {
    /// Parse a suite spec from a YAML string
    pub fn from_yaml(yaml: &str) -> FixtureResult<Self> {
        serde_yaml::from_str(yaml).map_err(FixtureError::from)
    }

    /// Parse a suite spec from a YAML file
    pub fn from_file(path: &Path) -> FixtureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all suite specs from a directory
    pub fn load_all(dir: &Path) -> FixtureResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }
}
