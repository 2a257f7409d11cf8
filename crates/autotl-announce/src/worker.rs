//! Channel consumer that runs each announcement on its own task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::pipeline::{Outcome, Pipeline, Rejection};

/// Outcome counts for one worker run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Lines taken off the channel.
    pub received: usize,
    /// Announcements that reached the daemon.
    pub added: usize,
    /// Lines that did not parse.
    pub parse_errors: usize,
    /// Names with the excluded language marker.
    pub language: usize,
    /// Names no filter matched.
    pub filtered: usize,
    /// Names the daemon already had or that were already in flight.
    pub duplicates: usize,
    /// Announcements skipped because the torrent list was unavailable.
    pub duplicate_check_failures: usize,
    /// Adds the daemon did not accept.
    pub submit_errors: usize,
    /// Tasks that panicked before producing an outcome.
    pub aborted: usize,
}

impl WorkerSummary {
    fn record(&mut self, outcome: &Outcome) {
        let counter = match outcome.rejection() {
            None => &mut self.added,
            Some(Rejection::ParseError) => &mut self.parse_errors,
            Some(Rejection::Language) => &mut self.language,
            Some(Rejection::Filtered) => &mut self.filtered,
            Some(Rejection::Duplicate) => &mut self.duplicates,
            Some(Rejection::DuplicateCheckFailed) => &mut self.duplicate_check_failures,
            Some(Rejection::SubmitError) => &mut self.submit_errors,
        };
        *counter += 1;
    }

    /// Announcements that ended in any rejection.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.parse_errors
            + self.language
            + self.filtered
            + self.duplicates
            + self.duplicate_check_failures
            + self.submit_errors
    }
}

/// Feeds raw announcement lines from a channel into a [`Pipeline`].
#[derive(Clone)]
pub struct AnnouncementWorker {
    pipeline: Arc<Pipeline>,
}

impl AnnouncementWorker {
    /// Worker bound to `pipeline`.
    #[must_use]
    pub const fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Spawn the worker on the current runtime and return the sending half
    /// of a channel holding up to `capacity` pending lines.
    #[must_use]
    pub fn spawn(
        pipeline: Arc<Pipeline>,
        capacity: usize,
    ) -> (mpsc::Sender<String>, JoinHandle<WorkerSummary>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = Self::new(pipeline);
        let handle = tokio::spawn(async move { worker.run(receiver).await });
        (sender, handle)
    }

    /// Process lines until the channel closes and every in-flight
    /// announcement has finished.
    pub async fn run(self, mut lines: mpsc::Receiver<String>) -> WorkerSummary {
        let mut tasks = JoinSet::new();
        let mut summary = WorkerSummary::default();
        let mut open = true;

        while open || !tasks.is_empty() {
            tokio::select! {
                line = lines.recv(), if open => {
                    if let Some(line) = line {
                        summary.received += 1;
                        let pipeline = Arc::clone(&self.pipeline);
                        tasks.spawn(async move { pipeline.handle(&line).await });
                    } else {
                        debug!(pending = tasks.len(), "announcement source closed");
                        open = false;
                    }
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    match joined {
                        Ok(outcome) => summary.record(&outcome),
                        Err(err) => {
                            summary.aborted += 1;
                            error!(error = %err, "announcement task aborted");
                        }
                    }
                }
            }
        }

        info!(
            received = summary.received,
            added = summary.added,
            rejected = summary.rejected(),
            aborted = summary.aborted,
            "announcement worker stopped"
        );
        summary
    }
}
