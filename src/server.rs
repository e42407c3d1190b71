//! Server fixture - spawning the app server and tearing it down
//!
//! The server is spawned into its own process group so that teardown can
//! kill the whole tree (the Flask entry point forks worker children;
//! killing only the top-level interpreter leaves them running).

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{FixtureError, FixtureResult};
use crate::readiness;

/// Handle to the running server process
///
/// Exactly one exists per suite run. Dropping the handle kills the process
/// group, so the server is not orphaned when the runner exits outside the
/// normal teardown path.
pub struct ServerHandle {
    child: Child,
    pid: u32,
    base_url: String,
}

impl ServerHandle {
    /// Spawn the server and wait for its startup announcement
    ///
    /// The interpreter is invoked with the entry-point path as its only
    /// argument. stdout is drained to the debug log; stderr is scanned for
    /// the announcement line, bounded by `config.startup_timeout`.
    pub async fn spawn(config: ServerConfig) -> FixtureResult<Self> {
        info!(
            "Spawning server: {} {}",
            config.interpreter.display(),
            config.script.display()
        );

        let mut cmd = Command::new(&config.interpreter);
        cmd.arg(&config.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so stop() can signal the whole tree
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|e| {
            FixtureError::ServerStartup(format!(
                "Failed to spawn {}: {}",
                config.interpreter.display(),
                e
            ))
        })?;

        let pid = child.id().ok_or_else(|| {
            FixtureError::ServerStartup("Server exited before it could be tracked".into())
        })?;
        debug!("Spawned server with pid {}", pid);

        let stdout = child.stdout.take().expect("stdout was piped");
        tokio::spawn(readiness::drain_lines(BufReader::new(stdout).lines(), "out"));

        let stderr = child.stderr.take().expect("stderr was piped");
        let mut lines = BufReader::new(stderr).lines();

        let announced = timeout(
            config.startup_timeout,
            readiness::wait_for_announcement(&mut lines),
        )
        .await;

        let base_url = match announced {
            Ok(Ok(Some(endpoint))) => endpoint,
            Ok(Ok(None)) => {
                // Diagnostic stream closed without an announcement
                kill_group(pid);
                let status = child.wait().await?;
                return Err(FixtureError::ServerExited { status });
            }
            Ok(Err(e)) => {
                kill_group(pid);
                let _ = child.wait().await;
                return Err(FixtureError::Io(e));
            }
            Err(_) => {
                kill_group(pid);
                let _ = child.wait().await;
                return Err(FixtureError::StartupTimeout {
                    waited: config.startup_timeout,
                });
            }
        };

        // Later diagnostic output is still logged, but readiness is decided
        tokio::spawn(readiness::drain_lines(lines, "err"));

        info!("Server started on {} (pid {})", base_url, pid);

        Ok(Self {
            child,
            pid,
            base_url,
        })
    }

    /// The endpoint the server announced, trimmed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process id of the spawned server
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// Kill the server's process group and wait until the server is reaped
    ///
    /// Safe to call again after the server is already dead.
    pub async fn stop(&mut self) -> FixtureResult<()> {
        kill_group(self.pid);
        let _ = self.child.start_kill();
        let status = self.child.wait().await?;
        debug!("Server pid {} stopped ({})", self.pid, status);
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        kill_group(self.pid);
        let _ = self.child.start_kill();
    }
}

/// Send SIGKILL to the server's process group
///
/// A group that is already gone counts as stopped; the error is only
/// logged.
#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        debug!("killpg({}) -> {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}
