//! Line source that stands in for the announcement transport.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Forward every non-blank line from `reader` onto `lines`.
///
/// Stops at end of input or when the receiving side has gone away, and
/// returns the number of lines forwarded.
///
/// # Errors
///
/// Returns [`AppError::Io`] if reading fails.
pub async fn forward_lines<R>(reader: R, lines: mpsc::Sender<String>) -> AppResult<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut input = reader.lines();
    let mut forwarded = 0;
    while let Some(line) = input.next_line().await.map_err(|source| AppError::Io {
        operation: "announce.read_line",
        path: None,
        source,
    })? {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if lines.send(line.to_string()).await.is_err() {
            debug!("announcement channel closed; no longer reading input");
            break;
        }
        forwarded += 1;
    }
    Ok(forwarded)
}
