//! Integration tests for the server fixture
//!
//! These spawn real child processes: `/bin/sh` entry points standing in
//! for the app server, written to a temp directory per test.

#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use kbsearch_e2e::{FixtureError, ServerConfig, ServerHandle};

fn fake_server(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("server.sh");
    std::fs::write(&path, body).expect("write fake server script");
    path
}

fn config(script: PathBuf) -> ServerConfig {
    ServerConfig {
        interpreter: PathBuf::from("/bin/sh"),
        script,
        startup_timeout: Duration::from_secs(5),
    }
}

fn process_alive(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid), None).is_ok()
}

/// Poll until the process is gone or the deadline passes
///
/// Yields to the runtime between probes so a child handed to the reaper
/// on drop can actually be reaped.
async fn wait_until_dead(pid: i32, deadline: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if !process_alive(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn discovers_endpoint_from_announcement() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(
        &dir,
        "echo 'Running on http://127.0.0.1:5000 (Press CTRL+C to quit)' >&2\nsleep 30\n",
    );

    let mut server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");
    assert_eq!(server.base_url(), "http://127.0.0.1:5000");

    server.stop().await.expect("stop should succeed");
}

#[tokio::test]
async fn announcement_keeps_scheme_and_trailing_slash() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(
        &dir,
        "echo 'Running on http://localhost:8080/ (Press CTRL+C to quit)' >&2\nsleep 30\n",
    );

    let mut server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");
    assert_eq!(server.base_url(), "http://localhost:8080/");

    server.stop().await.expect("stop should succeed");
}

#[tokio::test]
async fn noise_before_announcement_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(
        &dir,
        "echo ' * Serving Flask app \"server\"' >&2\n\
         echo ' * Running on http://127.0.0.1:5000 (Press CTRL+C to quit)' >&2\n\
         sleep 30\n",
    );

    let mut server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");
    assert_eq!(server.base_url(), "http://127.0.0.1:5000");

    server.stop().await.expect("stop should succeed");
}

#[tokio::test]
async fn exit_without_announcement_is_an_error() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(&dir, "echo 'boom' >&2\nexit 3\n");

    let result = ServerHandle::spawn(config(script)).await;
    match result {
        Err(FixtureError::ServerExited { .. }) => {}
        other => panic!("expected ServerExited, got {:?}", other.map(|s| s.id())),
    }
}

#[tokio::test]
async fn silent_server_times_out() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(&dir, "sleep 30\n");
    let cfg = ServerConfig {
        startup_timeout: Duration::from_millis(500),
        ..config(script)
    };

    let start = Instant::now();
    let result = ServerHandle::spawn(cfg).await;
    match result {
        Err(FixtureError::StartupTimeout { waited }) => {
            assert_eq!(waited, Duration::from_millis(500));
        }
        other => panic!("expected StartupTimeout, got {:?}", other.map(|s| s.id())),
    }
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn stop_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(
        &dir,
        "echo 'Running on http://127.0.0.1:5000 (Press CTRL+C to quit)' >&2\nsleep 30\n",
    );

    let mut server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");

    server.stop().await.expect("first stop should succeed");
    server.stop().await.expect("second stop should succeed");
}

#[tokio::test]
async fn stop_kills_the_whole_process_tree() {
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("worker.pid");
    let script = fake_server(
        &dir,
        &format!(
            "sleep 60 &\n\
             echo $! > '{}'\n\
             echo 'Running on http://127.0.0.1:5000 (Press CTRL+C to quit)' >&2\n\
             wait\n",
            pid_file.display()
        ),
    );

    let mut server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");

    // The worker pid is written before the announcement, so it exists now
    let worker_pid: i32 = std::fs::read_to_string(&pid_file)
        .expect("worker pid file")
        .trim()
        .parse()
        .expect("worker pid");
    assert!(process_alive(worker_pid), "worker should be running");

    let server_pid = server.id() as i32;
    server.stop().await.expect("stop should succeed");

    assert!(
        wait_until_dead(server_pid, Duration::from_secs(2)).await,
        "server should be dead after stop"
    );
    assert!(
        wait_until_dead(worker_pid, Duration::from_secs(2)).await,
        "worker should be dead after stop"
    );
}

#[tokio::test]
async fn dropping_the_handle_kills_the_server() {
    let dir = TempDir::new().unwrap();
    let script = fake_server(
        &dir,
        "echo 'Running on http://127.0.0.1:5000 (Press CTRL+C to quit)' >&2\nsleep 30\n",
    );

    let server = ServerHandle::spawn(config(script))
        .await
        .expect("server should start");
    let pid = server.id() as i32;

    drop(server);

    assert!(
        wait_until_dead(pid, Duration::from_secs(5)).await,
        "server should be dead after drop"
    );
}
