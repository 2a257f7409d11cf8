//! One-shot daemon commands.

use std::path::{Path, PathBuf};

pub use autotl_rpc::AddOptions;
use autotl_rpc::{SortDirection, SortField, TransmissionClient, sort_torrents};

use crate::error::{AppError, AppResult};
use crate::output::{OutputFormat, render_added, render_torrent_list};

/// Where a torrent handed to `add` comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddSource {
    /// Magnet URI.
    Magnet(String),
    /// HTTP(S) URL the daemon downloads itself.
    Url(String),
    /// Torrent file on this machine, uploaded as metainfo.
    LocalFile(PathBuf),
    /// Anything else, passed through for the daemon to resolve on its host.
    DaemonPath(String),
}

impl AddSource {
    /// Classify a user-supplied source.
    #[must_use]
    pub fn classify(source: &str) -> Self {
        let lowered = source.to_ascii_lowercase();
        if lowered.starts_with("magnet:") {
            Self::Magnet(source.to_string())
        } else if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Self::Url(source.to_string())
        } else if Path::new(source).is_file() {
            Self::LocalFile(PathBuf::from(source))
        } else {
            Self::DaemonPath(source.to_string())
        }
    }
}

/// List torrents in the requested order and render them.
///
/// # Errors
///
/// Returns an error if the daemon call or rendering fails.
pub async fn list(
    client: &TransmissionClient,
    field: SortField,
    direction: SortDirection,
    format: OutputFormat,
) -> AppResult<String> {
    let mut torrents = client
        .list_torrents()
        .await
        .map_err(|source| AppError::Rpc {
            operation: "torrent.list",
            source,
        })?;
    sort_torrents(&mut torrents, field, direction);
    render_torrent_list(&torrents, format)
}

/// Add a torrent and render what the daemon admitted.
///
/// # Errors
///
/// Returns an error if a local source cannot be read, the daemon call fails,
/// or rendering fails.
pub async fn add(
    client: &TransmissionClient,
    source: &AddSource,
    options: &AddOptions,
    format: OutputFormat,
) -> AppResult<String> {
    let added = match source {
        AddSource::Magnet(link) => client.add_by_magnet(link, options).await,
        AddSource::Url(url) => client.add_by_url(url, options).await,
        AddSource::LocalFile(path) => client.add_by_file(path, options).await,
        AddSource::DaemonPath(path) => client.add_by_filename(path, options).await,
    }
    .map_err(|source| AppError::Rpc {
        operation: "torrent.add",
        source,
    })?;
    render_added(&added, format)
}

/// Start a torrent and return the daemon's result string.
///
/// # Errors
///
/// Returns an error if the daemon call fails.
pub async fn start(client: &TransmissionClient, id: i64) -> AppResult<String> {
    client.start(id).await.map_err(|source| AppError::Rpc {
        operation: "torrent.start",
        source,
    })
}

/// Stop a torrent and return the daemon's result string.
///
/// # Errors
///
/// Returns an error if the daemon call fails.
pub async fn stop(client: &TransmissionClient, id: i64) -> AppResult<String> {
    client.stop(id).await.map_err(|source| AppError::Rpc {
        operation: "torrent.stop",
        source,
    })
}

/// Remove a torrent and return the daemon's result string.
///
/// # Errors
///
/// Returns an error if the daemon call fails.
pub async fn remove(client: &TransmissionClient, id: i64, delete_data: bool) -> AppResult<String> {
    client
        .remove(id, delete_data)
        .await
        .map_err(|source| AppError::Rpc {
            operation: "torrent.remove",
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_are_classified_by_shape() {
        assert!(matches!(
            AddSource::classify("magnet:?xt=urn:btih:abc"),
            AddSource::Magnet(_)
        ));
        assert!(matches!(
            AddSource::classify("HTTPS://example.org/a.torrent"),
            AddSource::Url(_)
        ));
        assert_eq!(
            AddSource::classify("/definitely/not/here.torrent"),
            AddSource::DaemonPath("/definitely/not/here.torrent".to_string())
        );
    }

    #[test]
    fn existing_files_are_local_sources() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let source = AddSource::classify(file.path().to_str().expect("utf-8 path"));
        assert_eq!(source, AddSource::LocalFile(file.path().to_path_buf()));
    }
}
