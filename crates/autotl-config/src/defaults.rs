//! Default values applied when the environment leaves a setting unset.

/// Default Transmission base URL.
pub const DEFAULT_TRANSMISSION_URL: &str = "http://127.0.0.1:9091";
/// Default RPC username.
pub const DEFAULT_USERNAME: &str = "transmission";
/// Default RPC password.
pub const DEFAULT_PASSWORD: &str = "transmission";
/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Default wait before submitting an add, giving the tracker time to register it.
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 5;
/// Default tracker site hosting announcements and downloads.
pub const DEFAULT_SITE: &str = "www.torrentleech.org";
