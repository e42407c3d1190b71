//! Startup announcement scanning
//!
//! The server announces its bind address on its diagnostic stream with a
//! line like `Running on http://127.0.0.1:5000 (Press CTRL+C to quit)`.
//! The first such line yields the endpoint; everything else on the stream
//! is logged and otherwise ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufRead, Lines};
use tracing::debug;

static ANNOUNCEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Running on (.+?) \(").expect("announcement pattern is valid"));

/// Extract the announced endpoint from a single diagnostic line
///
/// Captures the address between `Running on ` and the first ` (`, trimmed.
/// Returns `None` for lines that do not announce an address.
pub fn parse_announcement(line: &str) -> Option<String> {
    ANNOUNCEMENT
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// Scan diagnostic lines until the first announcement or end of stream
///
/// Every line is logged at debug level. Returns `None` when the stream
/// closes before any line matches.
pub(crate) async fn wait_for_announcement<R>(
    lines: &mut Lines<R>,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        debug!("[server][err] {}", line);
        if let Some(endpoint) = parse_announcement(&line) {
            return Ok(Some(endpoint));
        }
    }
    Ok(None)
}

/// Log remaining diagnostic lines until end of stream
///
/// Runs after readiness is decided; later matching lines do not change
/// the stored endpoint.
pub(crate) async fn drain_lines<R>(mut lines: Lines<R>, stream: &'static str)
where
    R: AsyncBufRead + Unpin,
{
    while let Ok(Some(line)) = lines.next_line().await {
        debug!("[server][{}] {}", stream, line);
    }
}
