//! HTTP transport for the daemon's single RPC endpoint.
//!
//! # Design
//! - The daemon guards its endpoint with a session id: a request without the
//!   current id gets `409 Conflict` plus the id to use in a response header.
//! - The id is cached for the lifetime of the client (shared by clones) and is
//!   only replaced when the daemon sends a new one.
//! - Each command is retried at most once after a conflict; a second conflict
//!   is a protocol error, and `401` is never retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{RpcError, RpcResult};

/// Header carrying the daemon session id in both directions.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";
/// Path of the RPC endpoint relative to the daemon base URL.
pub const RPC_PATH: &str = "/transmission/rpc";

/// Basic authentication credentials for the daemon.
#[derive(Clone)]
pub struct Credentials {
    /// RPC username.
    pub username: String,
    /// RPC password.
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Posts serialized commands to the daemon and negotiates the session id.
#[derive(Clone)]
pub struct SessionClient {
    http: Client,
    endpoint: Url,
    credentials: Option<Credentials>,
    session_id: Arc<RwLock<Option<String>>>,
}

impl SessionClient {
    /// Build a client with its own HTTP connection pool and a per-request
    /// timeout; expiry surfaces as [`RpcError::Transport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be derived from `base_url`
    /// or the HTTP client cannot be built.
    pub fn new(
        base_url: &Url,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> RpcResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RpcError::ClientBuild { source })?;
        Self::with_client(http, base_url, credentials)
    }

    /// Build a client around an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be derived from `base_url`.
    pub fn with_client(
        http: Client,
        base_url: &Url,
        credentials: Option<Credentials>,
    ) -> RpcResult<Self> {
        let endpoint = base_url
            .join(RPC_PATH)
            .map_err(|source| RpcError::Endpoint {
                value: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            endpoint,
            credentials,
            session_id: Arc::new(RwLock::new(None)),
        })
    }

    /// Endpoint every command is posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Session id currently attached to outgoing requests, if one was issued.
    pub async fn session_id(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Deliver a serialized command and return the raw response body.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Transport`] when the daemon is unreachable or times out.
    /// - [`RpcError::Auth`] when the daemon rejects the credentials.
    /// - [`RpcError::CsrfLoop`] when a conflict persists after one retry.
    /// - [`RpcError::MissingSessionId`] when a conflict carries no usable id.
    /// - [`RpcError::UnexpectedStatus`] for any other non-success status.
    pub async fn post(&self, body: &[u8]) -> RpcResult<Vec<u8>> {
        let current = self.session_id.read().await.clone();
        let response = self.send(body, current.as_deref()).await?;
        if response.status() != StatusCode::CONFLICT {
            return read_body(response).await;
        }

        let issued = issued_session_id(&response)?;
        replace_session_id(&self.session_id, current.as_deref(), &issued).await;

        let retry = self.send(body, Some(&issued)).await?;
        if retry.status() == StatusCode::CONFLICT {
            return Err(RpcError::CsrfLoop);
        }
        read_body(retry).await
    }

    async fn send(&self, body: &[u8], session_id: Option<&str>) -> RpcResult<Response> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(id) = session_id {
            request = request.header(SESSION_ID_HEADER, id);
        }
        request.send().await.map_err(|source| RpcError::Transport {
            operation: "rpc.post",
            source,
        })
    }
}

/// Cache `issued` unless a concurrent request already replaced the id this
/// request presented. Returns whether the cache was written.
async fn replace_session_id(
    cache: &RwLock<Option<String>>,
    presented: Option<&str>,
    issued: &str,
) -> bool {
    let mut cached = cache.write().await;
    if cached.as_deref() != presented {
        debug!("session id already renewed by a concurrent request");
        return false;
    }
    debug!(previous = presented.is_some(), "daemon issued a new session id");
    *cached = Some(issued.to_string());
    true
}

fn issued_session_id(response: &Response) -> RpcResult<String> {
    response
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(RpcError::MissingSessionId)
}

async fn read_body(response: Response) -> RpcResult<Vec<u8>> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(RpcError::Auth {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(RpcError::UnexpectedStatus {
            status: status.as_u16(),
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|source| RpcError::Transport {
            operation: "rpc.read_body",
            source,
        })?;
    Ok(bytes.to_vec())
}
