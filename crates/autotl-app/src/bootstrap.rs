//! The `watch` workflow: connect, build the pipeline, feed it lines.

use std::sync::Arc;

use autotl_announce::{AnnouncementWorker, Pipeline, WorkerSummary};
use autotl_config::{AnnounceConfig, AppConfig, DaemonConfig};
use autotl_rpc::{Credentials, TorrentDaemon, TransmissionClient};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::source::forward_lines;

/// Pending announcements buffered between the source and the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Build a daemon client from connection settings.
///
/// An empty username disables basic authentication.
///
/// # Errors
///
/// Returns [`AppError::Rpc`] if the client cannot be constructed.
pub fn connect(daemon: &DaemonConfig) -> AppResult<TransmissionClient> {
    let credentials = (!daemon.username.is_empty())
        .then(|| Credentials::new(daemon.username.clone(), daemon.password.clone()));
    TransmissionClient::connect(&daemon.url, credentials, daemon.timeout).map_err(|source| {
        AppError::Rpc {
            operation: "rpc.connect",
            source,
        }
    })
}

/// Watch announcements arriving on stdin until it closes.
///
/// # Errors
///
/// Returns an error if the client or pipeline cannot be built, stdin cannot
/// be read, or the worker stops abnormally.
pub async fn run_watch(config: &AppConfig, capacity: usize) -> AppResult<WorkerSummary> {
    log_effective_config(config);
    let client = connect(&config.daemon)?;
    let stdin = BufReader::new(tokio::io::stdin());
    watch(Arc::new(client), &config.announce, stdin, capacity).await
}

/// Run the announcement pipeline over every line `reader` yields.
///
/// Waits for in-flight announcements to finish before returning.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built, reading fails, or the
/// worker stops abnormally.
pub async fn watch<R>(
    daemon: Arc<dyn TorrentDaemon>,
    announce: &AnnounceConfig,
    reader: R,
    capacity: usize,
) -> AppResult<WorkerSummary>
where
    R: AsyncBufRead + Unpin,
{
    let pipeline = Pipeline::new(daemon, announce).map_err(|source| AppError::Announce {
        operation: "announce.pipeline",
        source,
    })?;
    info!(filters = pipeline.filter_count(), "watching for announcements");

    let (sender, worker) = AnnouncementWorker::spawn(Arc::new(pipeline), capacity);
    let forwarded = forward_lines(reader, sender).await;
    let summary = worker.await.map_err(|source| AppError::Worker { source })?;
    let forwarded = forwarded?;

    if summary.duplicate_check_failures > 0 || summary.submit_errors > 0 {
        warn!(
            duplicate_check_failures = summary.duplicate_check_failures,
            submit_errors = summary.submit_errors,
            "some announcements could not be handed to the daemon"
        );
    }
    info!(
        forwarded,
        added = summary.added,
        rejected = summary.rejected(),
        "announcement input closed"
    );
    Ok(summary)
}

fn log_effective_config(config: &AppConfig) {
    info!(version = env!("CARGO_PKG_VERSION"), "autotl starting");
    info!(daemon = ?config.daemon, announce = ?config.announce, "effective configuration");
    for filter in &config.announce.filters {
        info!(filter = %filter, "filter loaded");
    }
}
