//! Per-announcement state machine.
//!
//! Each raw line moves through parse, language filter, user filters,
//! duplicate check, settle delay, and submission. Every step either advances
//! or ends the announcement with a [`Rejection`]; nothing here aborts the
//! process.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use autotl_config::AnnounceConfig;
use autotl_rpc::{RpcCommand, RpcError, RpcResult, TorrentAdded, TorrentDaemon};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::error::AnnounceResult;
use crate::filter::{FilterSet, contains_blocked_language};
use crate::inflight::InflightNames;
use crate::link::{download_link, normalize_name};
use crate::parse::{Announcement, AnnouncementParser};

/// Why an announcement was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rejection {
    /// The line did not match the announcement pattern.
    ParseError,
    /// The name carries the excluded language marker.
    Language,
    /// No user filter matched the name.
    Filtered,
    /// The daemon already has a torrent with the same normalised name.
    Duplicate,
    /// The daemon could not be asked for its torrent list; the add is skipped.
    DuplicateCheckFailed,
    /// The daemon did not accept the add.
    SubmitError,
}

impl Rejection {
    /// Stable snake-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::Language => "language",
            Self::Filtered => "filtered",
            Self::Duplicate => "duplicate",
            Self::DuplicateCheckFailed => "duplicate_check_failed",
            Self::SubmitError => "submit_error",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal state of one announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The daemon accepted the add.
    Done {
        /// Torrent as reported by the daemon.
        added: TorrentAdded,
        /// Download link that was submitted.
        link: String,
    },
    /// The announcement was dropped.
    Rejected(Rejection),
}

impl Outcome {
    /// Rejection reason, if the announcement was dropped.
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Done { .. } => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }

    /// Whether the announcement ended in a successful add.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Announcement handling wired to a daemon.
pub struct Pipeline {
    daemon: Arc<dyn TorrentDaemon>,
    parser: AnnouncementParser,
    filters: FilterSet,
    inflight: InflightNames,
    site: String,
    access_key: String,
    add_paused: bool,
    settle_delay: Duration,
    download_dir: Option<String>,
}

impl Pipeline {
    /// Validate `config`, compile its patterns, and bind them to `daemon`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a filter does not
    /// compile.
    pub fn new(daemon: Arc<dyn TorrentDaemon>, config: &AnnounceConfig) -> AnnounceResult<Self> {
        config.validate()?;
        Ok(Self {
            daemon,
            parser: AnnouncementParser::new(&config.site)?,
            filters: FilterSet::compile(&config.filters)?,
            inflight: InflightNames::new(),
            site: config.site.clone(),
            access_key: config.access_key.clone(),
            add_paused: config.add_paused,
            settle_delay: config.settle_delay,
            download_dir: config.download_dir.clone(),
        })
    }

    /// Number of compiled user filters.
    #[must_use]
    pub const fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Drive one raw line to its terminal state.
    pub async fn handle(&self, line: &str) -> Outcome {
        let span = info_span!("announcement", announcement_id = %Uuid::new_v4());
        self.process(line).instrument(span).await
    }

    async fn process(&self, line: &str) -> Outcome {
        let Some(announcement) = self.parser.parse(line) else {
            warn!(line, "announcement did not match the expected pattern");
            return Outcome::Rejected(Rejection::ParseError);
        };
        info!(
            category = %announcement.category,
            name = %announcement.name,
            uploader = %announcement.uploader,
            torrent_id = announcement.torrent_id,
            "announcement received"
        );

        if contains_blocked_language(&announcement.name) {
            return rejected(Rejection::Language);
        }
        let Some(pattern) = self.filters.first_match(&announcement.name) else {
            return rejected(Rejection::Filtered);
        };
        debug!(pattern, "filter matched");

        let normalized = normalize_name(&announcement.name);
        let _claim = self.inflight.claim(&normalized).await;
        match self.already_added(&normalized).await {
            Ok(false) => {}
            Ok(true) => return rejected(Rejection::Duplicate),
            Err(err) => {
                report_rpc_failure(&err, "duplicate check failed; skipping add");
                return rejected(Rejection::DuplicateCheckFailed);
            }
        }

        self.submit(&announcement).await
    }

    async fn already_added(&self, normalized: &str) -> RpcResult<bool> {
        let torrents = self.daemon.list_torrents().await?;
        Ok(torrents
            .iter()
            .any(|torrent| normalize_name(&torrent.name) == normalized))
    }

    async fn submit(&self, announcement: &Announcement) -> Outcome {
        let link = download_link(
            &self.site,
            announcement.torrent_id,
            &self.access_key,
            &announcement.name,
        );
        let command = self.add_command(&link);

        if !self.settle_delay.is_zero() {
            debug!(
                delay_secs = self.settle_delay.as_secs_f64(),
                "waiting for tracker to settle"
            );
            tokio::time::sleep(self.settle_delay).await;
        }

        match self.daemon.add_torrent(&command).await {
            Ok(added) => {
                info!(
                    id = added.id,
                    hash = %added.hash_string,
                    paused = self.add_paused,
                    "torrent added"
                );
                Outcome::Done { added, link }
            }
            Err(err) => {
                report_rpc_failure(&err, "torrent add failed");
                rejected(Rejection::SubmitError)
            }
        }
    }

    fn add_command(&self, link: &str) -> RpcCommand {
        let mut command = RpcCommand::add_by_url(link);
        command.set_paused(self.add_paused);
        if let Some(dir) = &self.download_dir {
            command.set_download_dir(dir.clone());
        }
        command
    }
}

fn rejected(reason: Rejection) -> Outcome {
    info!(reason = reason.as_str(), "announcement rejected");
    Outcome::Rejected(reason)
}

fn report_rpc_failure(err: &RpcError, message: &'static str) {
    if err.is_protocol() {
        error!(error = %err, fatal = true, "{message}");
    } else {
        warn!(error = %err, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autotl_rpc::Torrent;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LINE: &str = "New Torrent Announcement: <Movies>  Name:'CentOS 7.0 x64' uploaded by 'someone' -  https://www.torrentleech.org/torrent/1234";

    #[derive(Default)]
    struct FakeDaemon {
        existing: Vec<String>,
        list_fails: bool,
        add_fails: bool,
        failing_adds: AtomicUsize,
        auth_fails: bool,
        list_calls: AtomicUsize,
        submitted: Mutex<Vec<RpcCommand>>,
    }

    impl FakeDaemon {
        fn submitted(&self) -> Vec<RpcCommand> {
            self.submitted.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl TorrentDaemon for FakeDaemon {
        async fn list_torrents(&self) -> RpcResult<Vec<Torrent>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.auth_fails {
                return Err(RpcError::Auth { status: 401 });
            }
            if self.list_fails {
                return Err(RpcError::UnexpectedStatus { status: 503 });
            }
            Ok(self
                .existing
                .iter()
                .enumerate()
                .map(|(index, name)| Torrent {
                    id: i64::try_from(index).unwrap_or_default() + 1,
                    name: name.clone(),
                    ..Torrent::default()
                })
                .collect())
        }

        async fn add_torrent(&self, command: &RpcCommand) -> RpcResult<TorrentAdded> {
            self.submitted.lock().expect("lock").push(command.clone());
            let flaky = self
                .failing_adds
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if flaky {
                return Err(RpcError::UnexpectedStatus { status: 503 });
            }
            if self.add_fails {
                return Err(RpcError::Failed {
                    method: command.method.clone(),
                    result: "invalid or corrupt torrent file".to_string(),
                });
            }
            Ok(TorrentAdded {
                hash_string: "875a2d90068c32b4ce7992eaf56cd03f5be0d193".to_string(),
                id: 7,
                name: "CentOS.7.0.x64".to_string(),
            })
        }
    }

    fn config(filters: &[&str]) -> AnnounceConfig {
        let mut config = AnnounceConfig::new(
            "rsskey",
            filters.iter().map(ToString::to_string).collect(),
        );
        config.settle_delay = Duration::ZERO;
        config
    }

    fn pipeline(daemon: &Arc<FakeDaemon>, config: &AnnounceConfig) -> Pipeline {
        let daemon: Arc<dyn TorrentDaemon> = daemon.clone();
        Pipeline::new(daemon, config).expect("pipeline should build")
    }

    #[tokio::test(start_paused = true)]
    async fn matching_announcement_is_added_after_settle_delay() {
        let daemon = Arc::new(FakeDaemon {
            existing: vec!["Something.Else".to_string()],
            ..FakeDaemon::default()
        });
        let mut config = config(&["CentOS"]);
        config.settle_delay = Duration::from_secs(5);
        let pipeline = pipeline(&daemon, &config);

        let started = tokio::time::Instant::now();
        let outcome = pipeline.handle(LINE).await;

        assert!(started.elapsed() >= Duration::from_secs(5));
        match outcome {
            Outcome::Done { added, link } => {
                assert_eq!(added.id, 7);
                assert!(link.contains("1234"));
                assert!(link.ends_with("CentOS.7.0.x64.torrent"));
            }
            other @ Outcome::Rejected(_) => panic!("unexpected outcome {other:?}"),
        }
        let submitted = daemon.submitted();
        assert_eq!(submitted.len(), 1);
        let filename = submitted[0].arguments.filename.as_deref().unwrap_or_default();
        assert_eq!(
            filename,
            "https://www.torrentleech.org/rss/download/1234/rsskey/CentOS.7.0.x64.torrent"
        );
        assert!(!submitted[0].arguments.paused);
        assert_eq!(pipeline.inflight.tracked(), 0);
    }

    #[tokio::test]
    async fn paused_flag_and_download_dir_are_applied() {
        let daemon = Arc::new(FakeDaemon::default());
        let mut config = config(&["CentOS"]);
        config.add_paused = true;
        config.download_dir = Some("/srv/downloads".to_string());
        let pipeline = pipeline(&daemon, &config);

        assert!(pipeline.handle(LINE).await.is_done());

        let submitted = daemon.submitted();
        assert!(submitted[0].arguments.paused);
        assert_eq!(
            submitted[0].arguments.download_dir.as_deref(),
            Some("/srv/downloads")
        );
    }

    #[tokio::test]
    async fn french_names_are_rejected_before_filters() {
        let daemon = Arc::new(FakeDaemon::default());
        let pipeline = pipeline(&daemon, &config(&["CentOS", ".*"]));
        let line = "New Torrent Announcement: <Movies>  Name:'CentOS 7.0 x64 FrEnCh' uploaded by 'someone' -  https://www.torrentleech.org/torrent/1234";

        let outcome = pipeline.handle(line).await;

        assert_eq!(outcome.rejection(), Some(Rejection::Language));
        assert_eq!(daemon.list_calls.load(Ordering::SeqCst), 0);
        assert!(daemon.submitted().is_empty());
    }

    #[tokio::test]
    async fn unmatched_names_are_filtered() {
        let daemon = Arc::new(FakeDaemon::default());
        let pipeline = pipeline(&daemon, &config(&["Ubuntu", "Debian"]));

        let outcome = pipeline.handle(LINE).await;

        assert_eq!(outcome, Outcome::Rejected(Rejection::Filtered));
        assert_eq!(daemon.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn parse_errors_do_not_stop_later_announcements() {
        let daemon = Arc::new(FakeDaemon::default());
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));
        let broken = "New Torrent Announcement: <Movies>  Name:'CentOS's 7.0 x64' uploaded by 'someone' -  https://www.torrentleech.org/torrent/1234";

        assert_eq!(
            pipeline.handle(broken).await.rejection(),
            Some(Rejection::ParseError)
        );
        assert!(pipeline.handle(LINE).await.is_done());
    }

    #[tokio::test]
    async fn existing_torrent_is_a_duplicate() {
        let daemon = Arc::new(FakeDaemon {
            existing: vec!["CentOS.7.0.x64".to_string()],
            ..FakeDaemon::default()
        });
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));

        let outcome = pipeline.handle(LINE).await;

        assert_eq!(outcome.rejection(), Some(Rejection::Duplicate));
        assert!(daemon.submitted().is_empty());
    }

    #[tokio::test]
    async fn stored_names_with_spaces_are_normalised_too() {
        let daemon = Arc::new(FakeDaemon {
            existing: vec!["CentOS 7.0 x64".to_string()],
            ..FakeDaemon::default()
        });
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));

        assert_eq!(
            pipeline.handle(LINE).await.rejection(),
            Some(Rejection::Duplicate)
        );
    }

    #[tokio::test]
    async fn list_failure_skips_the_add() {
        let daemon = Arc::new(FakeDaemon {
            list_fails: true,
            ..FakeDaemon::default()
        });
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));

        let outcome = pipeline.handle(LINE).await;

        assert_eq!(outcome.rejection(), Some(Rejection::DuplicateCheckFailed));
        assert!(daemon.submitted().is_empty());
        assert_eq!(pipeline.inflight.tracked(), 0);
    }

    #[tokio::test]
    async fn protocol_failure_during_list_is_also_a_failed_check() {
        let daemon = Arc::new(FakeDaemon {
            auth_fails: true,
            ..FakeDaemon::default()
        });
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));

        assert_eq!(
            pipeline.handle(LINE).await.rejection(),
            Some(Rejection::DuplicateCheckFailed)
        );
    }

    #[tokio::test]
    async fn submit_failure_is_reported_not_fatal() {
        let daemon = Arc::new(FakeDaemon {
            add_fails: true,
            ..FakeDaemon::default()
        });
        let pipeline = pipeline(&daemon, &config(&["CentOS"]));

        assert_eq!(
            pipeline.handle(LINE).await.rejection(),
            Some(Rejection::SubmitError)
        );
        assert_eq!(daemon.submitted().len(), 1);
        assert_eq!(
            pipeline.handle(LINE).await.rejection(),
            Some(Rejection::SubmitError)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn same_name_waits_and_retries_after_failed_add() {
        let daemon = Arc::new(FakeDaemon {
            failing_adds: AtomicUsize::new(1),
            ..FakeDaemon::default()
        });
        let mut config = config(&["CentOS"]);
        config.settle_delay = Duration::from_secs(5);
        let pipeline = pipeline(&daemon, &config);

        let (first, second) = tokio::join!(pipeline.handle(LINE), pipeline.handle(LINE));

        assert_eq!(first.rejection(), Some(Rejection::SubmitError));
        assert!(second.is_done());
        assert_eq!(daemon.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(daemon.submitted().len(), 2);
        assert_eq!(pipeline.inflight.tracked(), 0);
    }

    #[test]
    fn invalid_filter_fails_construction() {
        let daemon: Arc<dyn TorrentDaemon> = Arc::new(FakeDaemon::default());
        let result = Pipeline::new(daemon, &config(&["(unclosed"]));
        assert!(matches!(
            result,
            Err(crate::AnnounceError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let daemon: Arc<dyn TorrentDaemon> = Arc::new(FakeDaemon::default());
        let result = Pipeline::new(daemon, &AnnounceConfig::new("", vec!["x".to_string()]));
        assert!(matches!(result, Err(crate::AnnounceError::Config { .. })));
    }

    #[test]
    fn rejection_labels_are_snake_case() {
        assert_eq!(Rejection::DuplicateCheckFailed.to_string(), "duplicate_check_failed");
        assert_eq!(Rejection::ParseError.as_str(), "parse_error");
    }
}
