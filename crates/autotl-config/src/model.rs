//! Configuration values, constructed once at startup and shared read-only.

use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use url::Url;

use crate::defaults::{DEFAULT_SETTLE_DELAY_SECS, DEFAULT_SITE};
use crate::error::{ConfigError, ConfigResult};
use crate::validate::{parse_daemon_url, require_non_empty, validate_filters, validate_site};

/// Connection settings for the download daemon.
#[derive(Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Base URL of the daemon; the RPC path is appended by the client.
    pub url: Url,
    /// RPC username.
    pub username: String,
    /// RPC password.
    pub password: String,
    /// Upper bound applied to every HTTP call.
    pub timeout: Duration,
}

impl DaemonConfig {
    /// Parse and validate daemon connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not HTTP(S), or the
    /// timeout is zero.
    pub fn new(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout_secs: u64,
    ) -> ConfigResult<Self> {
        let url = parse_daemon_url(url)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                field: "http_timeout_secs",
                value: Some(timeout_secs.to_string()),
                reason: "zero",
            });
        }
        Ok(Self {
            url,
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Debug for DaemonConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DaemonConfig")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings that drive announcement filtering and submission.
#[derive(Clone, PartialEq, Eq)]
pub struct AnnounceConfig {
    /// Tracker host that publishes announcements and serves downloads.
    pub site: String,
    /// Per-user key embedded in generated download links.
    pub access_key: String,
    /// Add matched torrents in the paused state.
    pub add_paused: bool,
    /// Wait before submitting an add so the tracker can register the torrent.
    pub settle_delay: Duration,
    /// Download directory override applied to every add.
    pub download_dir: Option<String>,
    /// Ordered filter patterns; any match accepts an announcement.
    pub filters: Vec<String>,
}

impl AnnounceConfig {
    /// Settings with defaults for everything except the access key and filters.
    #[must_use]
    pub fn new(access_key: impl Into<String>, filters: Vec<String>) -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            access_key: access_key.into(),
            add_paused: false,
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECS),
            download_dir: None,
            filters,
        }
    }

    /// Check the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns an error if the access key is blank, the filter list is empty
    /// or contains blank patterns, or the site is not a bare host name.
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("rss_key", &self.access_key)?;
        validate_site(&self.site)?;
        validate_filters(&self.filters)?;
        if let Some(dir) = &self.download_dir {
            require_non_empty("download_dir", dir)?;
        }
        Ok(())
    }
}

impl Debug for AnnounceConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AnnounceConfig")
            .field("site", &self.site)
            .field("access_key", &"<redacted>")
            .field("add_paused", &self.add_paused)
            .field("settle_delay", &self.settle_delay)
            .field("download_dir", &self.download_dir)
            .field("filters", &self.filters)
            .finish()
    }
}

/// Complete runtime configuration for the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Daemon connection settings.
    pub daemon: DaemonConfig,
    /// Announcement handling settings.
    pub announce: AnnounceConfig,
}

impl AppConfig {
    /// Combine and validate both halves.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure from [`AnnounceConfig::validate`].
    pub fn new(daemon: DaemonConfig, announce: AnnounceConfig) -> ConfigResult<Self> {
        announce.validate()?;
        Ok(Self { daemon, announce })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{
        DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PASSWORD, DEFAULT_TRANSMISSION_URL, DEFAULT_USERNAME,
    };

    #[test]
    fn daemon_defaults_match_stock_install() {
        let config = DaemonConfig::new(
            DEFAULT_TRANSMISSION_URL,
            DEFAULT_USERNAME,
            DEFAULT_PASSWORD,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )
        .expect("defaults should validate");
        assert_eq!(config.url.as_str(), "http://127.0.0.1:9091/");
        assert_eq!(config.username, "transmission");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn daemon_rejects_zero_timeout() {
        let err = DaemonConfig::new("http://127.0.0.1:9091", "u", "p", 0)
            .expect_err("zero timeout should fail");
        assert_eq!(err.field(), "http_timeout_secs");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let daemon = DaemonConfig::new("http://127.0.0.1:9091", "admin", "s3cret", 5)
            .expect("config should build");
        let announce = AnnounceConfig::new("rss-key-value", vec!["CentOS".to_string()]);
        let rendered = format!("{daemon:?} {announce:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("rss-key-value"));
        assert!(rendered.contains("CentOS"));
    }

    #[test]
    fn announce_validation_requires_key_and_filters() {
        assert!(
            AnnounceConfig::new("key", vec!["CentOS".to_string()])
                .validate()
                .is_ok()
        );

        let err = AnnounceConfig::new("", vec!["CentOS".to_string()])
            .validate()
            .expect_err("blank key should fail");
        assert_eq!(err.field(), "rss_key");

        let err = AnnounceConfig::new("key", Vec::new())
            .validate()
            .expect_err("missing filters should fail");
        assert_eq!(err.field(), "filters");

        let mut config = AnnounceConfig::new("key", vec!["CentOS".to_string()]);
        config.download_dir = Some(String::new());
        assert_eq!(
            config.validate().expect_err("blank dir").field(),
            "download_dir"
        );
    }

    #[test]
    fn announce_defaults_use_five_second_settle_delay() {
        let config = AnnounceConfig::new("key", vec!["x".to_string()]);
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert_eq!(config.site, "www.torrentleech.org");
        assert!(!config.add_paused);
    }

    #[test]
    fn app_config_validates_announce_half() {
        let daemon = DaemonConfig::new("http://127.0.0.1:9091", "u", "p", 5)
            .expect("daemon config should build");
        let ok = AppConfig::new(
            daemon.clone(),
            AnnounceConfig::new("key", vec!["CentOS".to_string()]),
        );
        assert!(ok.is_ok());

        let err = AppConfig::new(daemon, AnnounceConfig::new("key", Vec::new()))
            .expect_err("empty filters should fail");
        assert_eq!(err.field(), "filters");
    }
}
