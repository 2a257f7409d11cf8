//! Typed daemon operations built on the codec and the session client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::codec::{RpcCommand, Torrent, TorrentAdded};
use crate::error::{RpcError, RpcResult};
use crate::session::{Credentials, SessionClient};

/// Daemon operations the announcement pipeline relies on.
#[async_trait]
pub trait TorrentDaemon: Send + Sync {
    /// Retrieve the daemon's torrents in server order.
    async fn list_torrents(&self) -> RpcResult<Vec<Torrent>>;

    /// Submit a prepared `torrent-add` command.
    async fn add_torrent(&self, command: &RpcCommand) -> RpcResult<TorrentAdded>;
}

/// Settings shared by every add variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Add without starting.
    pub paused: bool,
    /// Download directory override.
    pub download_dir: Option<String>,
}

impl AddOptions {
    /// Options that only set the paused flag.
    #[must_use]
    pub fn paused(paused: bool) -> Self {
        Self {
            paused,
            download_dir: None,
        }
    }

    fn applied_to(&self, mut command: RpcCommand) -> RpcCommand {
        command.set_paused(self.paused);
        if let Some(dir) = &self.download_dir {
            command.set_download_dir(dir.clone());
        }
        command
    }
}

/// Transmission daemon client.
#[derive(Clone)]
pub struct TransmissionClient {
    session: SessionClient,
}

impl TransmissionClient {
    /// Wrap an existing session client.
    #[must_use]
    pub const fn new(session: SessionClient) -> Self {
        Self { session }
    }

    /// Build a client for the daemon at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session client cannot be constructed.
    pub fn connect(
        base_url: &Url,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> RpcResult<Self> {
        SessionClient::new(base_url, credentials, timeout).map(Self::new)
    }

    /// Underlying session client.
    #[must_use]
    pub const fn session(&self) -> &SessionClient {
        &self.session
    }

    /// Encode, post, and decode a command, returning the daemon's response
    /// regardless of its `result` value.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol, or codec errors from the round trip.
    #[instrument(name = "rpc.execute", skip_all, fields(method = %command.method))]
    pub async fn execute(&self, command: &RpcCommand) -> RpcResult<RpcCommand> {
        let body = command.encode()?;
        let output = self.session.post(&body).await?;
        let response = RpcCommand::decode(&output)?;
        debug!(result = %response.result, "rpc command completed");
        Ok(response)
    }

    async fn execute_checked(&self, command: &RpcCommand) -> RpcResult<RpcCommand> {
        let response = self.execute(command).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(RpcError::Failed {
                method: command.method.clone(),
                result: response.result,
            })
        }
    }

    /// List torrents in the order the daemon returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the daemon reports failure.
    pub async fn list_torrents(&self) -> RpcResult<Vec<Torrent>> {
        let response = self.execute_checked(&RpcCommand::torrent_get()).await?;
        Ok(response.arguments.torrents)
    }

    /// Submit a prepared add command and return the admitted torrent.
    ///
    /// A torrent the daemon already knows is reported through the same
    /// payload shape and returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails, the daemon reports failure,
    /// or a successful response names no torrent.
    pub async fn add(&self, command: &RpcCommand) -> RpcResult<TorrentAdded> {
        let response = self.execute_checked(command).await?;
        let arguments = response.arguments;
        if let Some(existing) = arguments.torrent_duplicate {
            debug!(id = existing.id, name = %existing.name, "daemon already had torrent");
            return Ok(existing);
        }
        arguments
            .torrent_added
            .ok_or_else(|| RpcError::MissingPayload {
                method: command.method.clone(),
                field: "torrent-added",
            })
    }

    /// Add a torrent from a URL.
    ///
    /// # Errors
    ///
    /// See [`TransmissionClient::add`].
    pub async fn add_by_url(&self, url: &str, options: &AddOptions) -> RpcResult<TorrentAdded> {
        self.add(&options.applied_to(RpcCommand::add_by_url(url)))
            .await
    }

    /// Add a torrent from a magnet link.
    ///
    /// # Errors
    ///
    /// See [`TransmissionClient::add`].
    pub async fn add_by_magnet(&self, link: &str, options: &AddOptions) -> RpcResult<TorrentAdded> {
        self.add(&options.applied_to(RpcCommand::add_by_magnet(link)))
            .await
    }

    /// Add a torrent file that lives on the daemon's host.
    ///
    /// # Errors
    ///
    /// See [`TransmissionClient::add`].
    pub async fn add_by_filename(
        &self,
        path: &str,
        options: &AddOptions,
    ) -> RpcResult<TorrentAdded> {
        self.add(&options.applied_to(RpcCommand::add_by_filename(path)))
            .await
    }

    /// Read a local torrent file and upload its contents.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Io`] if the file cannot be read, otherwise see
    /// [`TransmissionClient::add`].
    pub async fn add_by_file(
        &self,
        path: impl AsRef<Path>,
        options: &AddOptions,
    ) -> RpcResult<TorrentAdded> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RpcError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.add(&options.applied_to(RpcCommand::add_by_metainfo(&bytes)))
            .await
    }

    /// Start a torrent and return the daemon's result string.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol, or codec errors from the round trip.
    pub async fn start(&self, id: i64) -> RpcResult<String> {
        self.send_simple(RpcCommand::start(id)).await
    }

    /// Stop a torrent and return the daemon's result string.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol, or codec errors from the round trip.
    pub async fn stop(&self, id: i64) -> RpcResult<String> {
        self.send_simple(RpcCommand::stop(id)).await
    }

    /// Remove a torrent, optionally deleting its data, and return the
    /// daemon's result string.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol, or codec errors from the round trip.
    pub async fn remove(&self, id: i64, delete_local_data: bool) -> RpcResult<String> {
        self.send_simple(RpcCommand::remove(id, delete_local_data))
            .await
    }

    async fn send_simple(&self, command: RpcCommand) -> RpcResult<String> {
        Ok(self.execute(&command).await?.result)
    }
}

#[async_trait]
impl TorrentDaemon for TransmissionClient {
    async fn list_torrents(&self) -> RpcResult<Vec<Torrent>> {
        Self::list_torrents(self).await
    }

    async fn add_torrent(&self, command: &RpcCommand) -> RpcResult<TorrentAdded> {
        self.add(command).await
    }
}
