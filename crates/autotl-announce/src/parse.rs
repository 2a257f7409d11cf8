//! Extraction of announcement fields from raw feed lines.

use regex::Regex;

use crate::error::{AnnounceError, AnnounceResult};

/// Fields carried by a single announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Category label between angle brackets, e.g. `Movies :: HD`.
    pub category: String,
    /// Torrent name as published.
    pub name: String,
    /// Account that uploaded the torrent.
    pub uploader: String,
    /// Site-local numeric torrent id.
    pub torrent_id: u64,
}

/// Matches announcement lines published for one tracker site.
#[derive(Debug, Clone)]
pub struct AnnouncementParser {
    pattern: Regex,
}

impl AnnouncementParser {
    /// Build the parser for announcements that link to `site`.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceError::InvalidPattern`] if the pattern cannot be
    /// compiled.
    pub fn new(site: &str) -> AnnounceResult<Self> {
        let source = format!(
            r".*New Torrent Announcement:.* <([^>]*)>[\W]*Name:'([^']*)[\W]*uploaded by '([^']*)' -.*https://{}/torrent/(\d+).*$",
            regex::escape(site)
        );
        let pattern = Regex::new(&source).map_err(|source| AnnounceError::InvalidPattern {
            site: site.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Parse a raw line, returning `None` when it is not a well-formed
    /// announcement.
    ///
    /// Names containing an apostrophe end the name capture early and the
    /// line is rejected rather than guessed at.
    #[must_use]
    pub fn parse(&self, line: &str) -> Option<Announcement> {
        let captures = self.pattern.captures(line)?;
        let torrent_id = captures.get(4)?.as_str().parse().ok()?;
        Some(Announcement {
            category: captures.get(1)?.as_str().to_string(),
            name: captures.get(2)?.as_str().to_string(),
            uploader: captures.get(3)?.as_str().to_string(),
            torrent_id,
        })
    }
}
