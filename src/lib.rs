//! Knowledge Base Search E2E Test Harness
//!
//! This crate spawns the Knowledge Base Search server as a subprocess for
//! end-to-end test suites, discovers the endpoint to test against from the
//! server's own startup announcement, and guarantees the server's process
//! tree is torn down when the suite ends - normally or not.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Harness (Rust)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── start_server() -> ServerHandle                       │
//! │    │     ├── spawn interpreter + entry point                │
//! │    │     ├── scan stderr for "Running on <addr> ("          │
//! │    │     └── expose base_url()                              │
//! │    ├── run_all() -> SuiteResult                             │
//! │    └── stop_server()  (SIGKILL to the process group)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SuiteSpec (YAML)                                           │
//! │    ├── name, description, tags                              │
//! │    └── checks: [HttpCheck]                                  │
//! │          ├── path                                           │
//! │          ├── expect_status                                  │
//! │          └── body_equals | body_contains                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod readiness;
pub mod runner;
pub mod server;
pub mod spec;

pub use config::{LogConfig, LogLevel, RunnerConfig, ServerConfig};
pub use error::{FixtureError, FixtureResult};
pub use runner::TestRunner;
pub use server::ServerHandle;
pub use spec::{HttpCheck, SuiteSpec};
