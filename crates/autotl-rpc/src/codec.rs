//! Command and response DTOs for the Transmission RPC wire format.
//!
//! A request and a response share one shape: `{method, arguments, result}`.
//! Arguments are sparse; only the fields relevant to a method are populated
//! and empty fields are left off the wire.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::{RpcError, RpcResult};

/// Method name for listing torrents.
pub const METHOD_TORRENT_GET: &str = "torrent-get";
/// Method name for adding a torrent.
pub const METHOD_TORRENT_ADD: &str = "torrent-add";
/// Method name for removing a torrent.
pub const METHOD_TORRENT_REMOVE: &str = "torrent-remove";
/// Method name for starting a torrent.
pub const METHOD_TORRENT_START: &str = "torrent-start";
/// Method name for stopping a torrent.
pub const METHOD_TORRENT_STOP: &str = "torrent-stop";

/// Result string the daemon reports for a processed command.
pub const RESULT_SUCCESS: &str = "success";

/// Fields requested from the daemon by `torrent-get`.
pub const TORRENT_FIELDS: [&str; 16] = [
    "id",
    "name",
    "hashString",
    "status",
    "addedDate",
    "leftUntilDone",
    "eta",
    "uploadRatio",
    "rateDownload",
    "rateUpload",
    "downloadDir",
    "isFinished",
    "percentDone",
    "seedRatioMode",
    "error",
    "errorString",
];

/// RPC request or response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcCommand {
    /// Method identifier; empty on responses.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Method-specific arguments.
    #[serde(default)]
    pub arguments: Arguments,
    /// Status string; only populated on responses.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
}

/// Sparse argument bag shared by every supported method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    /// Torrent fields requested by `torrent-get`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Torrents returned by `torrent-get`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub torrents: Vec<Torrent>,
    /// Torrent ids targeted by start/stop/remove.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<i64>,
    /// Whether `torrent-remove` should delete downloaded data.
    #[serde(
        rename = "delete-local-data",
        default,
        skip_serializing_if = "is_false"
    )]
    pub delete_local_data: bool,
    /// Download directory override for `torrent-add`.
    #[serde(
        rename = "download-dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_dir: Option<String>,
    /// Base64-encoded torrent file contents for `torrent-add`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metainfo: Option<String>,
    /// URL, magnet link, or daemon-local path for `torrent-add`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Add the torrent without starting it.
    #[serde(default, skip_serializing_if = "is_false")]
    pub paused: bool,
    /// Torrent admitted by `torrent-add`.
    #[serde(
        rename = "torrent-added",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub torrent_added: Option<TorrentAdded>,
    /// Torrent the daemon already had when `torrent-add` was called.
    #[serde(
        rename = "torrent-duplicate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub torrent_duplicate: Option<TorrentAdded>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

/// Snapshot of a torrent as reported by `torrent-get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Torrent {
    /// Daemon-local numeric id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Daemon status code.
    pub status: i64,
    /// Unix timestamp at which the torrent was added.
    pub added_date: i64,
    /// Bytes still to download.
    pub left_until_done: i64,
    /// Estimated seconds to completion; negative when unknown.
    pub eta: i64,
    /// Upload ratio.
    pub upload_ratio: f64,
    /// Download rate in bytes per second.
    pub rate_download: i64,
    /// Upload rate in bytes per second.
    pub rate_upload: i64,
    /// Download directory.
    pub download_dir: String,
    /// Whether the torrent reached its seeding goal.
    pub is_finished: bool,
    /// Completion fraction between 0 and 1.
    pub percent_done: f64,
    /// Seed ratio mode code.
    pub seed_ratio_mode: i64,
    /// Info hash as a hex string.
    pub hash_string: String,
    /// Error code; zero when healthy.
    pub error: i64,
    /// Human-readable error description.
    pub error_string: String,
}

/// Result payload of `torrent-add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TorrentAdded {
    /// Info hash as a hex string.
    pub hash_string: String,
    /// Daemon-local numeric id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl RpcCommand {
    fn with_method(method: &str) -> Self {
        Self {
            method: method.to_string(),
            ..Self::default()
        }
    }

    /// `torrent-get` requesting the fixed field list.
    #[must_use]
    pub fn torrent_get() -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_GET);
        command.arguments.fields = TORRENT_FIELDS.iter().map(ToString::to_string).collect();
        command
    }

    fn add_filename(filename: impl Into<String>) -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_ADD);
        command.arguments.filename = Some(filename.into());
        command
    }

    /// `torrent-add` fetching a `.torrent` from a URL.
    #[must_use]
    pub fn add_by_url(url: impl Into<String>) -> Self {
        Self::add_filename(url)
    }

    /// `torrent-add` resolving a magnet link.
    #[must_use]
    pub fn add_by_magnet(link: impl Into<String>) -> Self {
        Self::add_filename(link)
    }

    /// `torrent-add` loading a file that lives on the daemon's host.
    #[must_use]
    pub fn add_by_filename(path: impl Into<String>) -> Self {
        Self::add_filename(path)
    }

    /// `torrent-add` carrying the raw torrent file contents.
    #[must_use]
    pub fn add_by_metainfo(bytes: &[u8]) -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_ADD);
        command.arguments.metainfo = Some(general_purpose::STANDARD.encode(bytes));
        command
    }

    /// `torrent-remove` for a single torrent.
    #[must_use]
    pub fn remove(id: i64, delete_local_data: bool) -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_REMOVE);
        command.arguments.ids = vec![id];
        command.arguments.delete_local_data = delete_local_data;
        command
    }

    /// `torrent-start` for a single torrent.
    #[must_use]
    pub fn start(id: i64) -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_START);
        command.arguments.ids = vec![id];
        command
    }

    /// `torrent-stop` for a single torrent.
    #[must_use]
    pub fn stop(id: i64) -> Self {
        let mut command = Self::with_method(METHOD_TORRENT_STOP);
        command.arguments.ids = vec![id];
        command
    }

    /// Override the download directory of an add command.
    pub fn set_download_dir(&mut self, dir: impl Into<String>) {
        self.arguments.download_dir = Some(dir.into());
    }

    /// Toggle whether an added torrent starts paused.
    pub const fn set_paused(&mut self, paused: bool) {
        self.arguments.paused = paused;
    }

    /// Whether the daemon reported success for this response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }

    /// Serialize the command into a request body.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Codec`] if serialization fails.
    pub fn encode(&self) -> RpcResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| RpcError::Codec {
            operation: "encode",
            source,
        })
    }

    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Codec`] if the body is not a valid response.
    pub fn decode(body: &[u8]) -> RpcResult<Self> {
        serde_json::from_slice(body).map_err(|source| RpcError::Codec {
            operation: "decode",
            source,
        })
    }
}
