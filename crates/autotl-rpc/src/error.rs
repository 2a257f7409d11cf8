//! Error types for Transmission RPC operations.
//!
//! # Design
//! - Keep messages constant; carry status codes, methods, and paths as fields.
//! - Separate transport failures (daemon unreachable, timed out, odd status)
//!   from protocol failures (credentials, session-id negotiation) and from
//!   codec failures (daemon replied with something that is not a response).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for daemon RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The HTTP request could not be delivered or its body could not be read.
    #[error("rpc transport failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The daemon answered with a status the protocol does not define.
    #[error("unexpected rpc response status")]
    UnexpectedStatus {
        /// HTTP status code returned by the daemon.
        status: u16,
    },
    /// The daemon rejected the configured credentials.
    #[error("rpc authentication rejected")]
    Auth {
        /// HTTP status code returned by the daemon.
        status: u16,
    },
    /// The daemon kept demanding a new session id after the single retry.
    #[error("session id negotiation did not converge")]
    CsrfLoop,
    /// A conflict response arrived without a usable session id header.
    #[error("session id header missing from conflict response")]
    MissingSessionId,
    /// Encoding a command or decoding a response body failed.
    #[error("rpc payload could not be processed")]
    Codec {
        /// Operation identifier (`encode` or `decode`).
        operation: &'static str,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// A successful response lacked the payload its method promises.
    #[error("rpc response is missing its payload")]
    MissingPayload {
        /// RPC method whose response was incomplete.
        method: String,
        /// Argument the response should have carried.
        field: &'static str,
    },
    /// A local torrent file could not be read.
    #[error("failed to read torrent file")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The daemon processed the command but reported a failure result.
    #[error("daemon rejected the command")]
    Failed {
        /// RPC method that was rejected.
        method: String,
        /// Result string reported by the daemon.
        result: String,
    },
    /// The configured daemon URL cannot host the RPC endpoint.
    #[error("invalid rpc endpoint")]
    Endpoint {
        /// Base URL supplied by the caller.
        value: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
}

impl RpcError {
    /// Whether the failure means the daemon could not be reached or answered
    /// outside the protocol (network errors, timeouts, unexpected statuses).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::UnexpectedStatus { .. })
    }

    /// Whether the failure is a protocol violation that retrying the same
    /// command will not fix.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. } | Self::CsrfLoop | Self::MissingSessionId
        )
    }

    /// Whether the daemon replied with a body that is not a valid response.
    #[must_use]
    pub const fn is_codec(&self) -> bool {
        matches!(self, Self::Codec { .. } | Self::MissingPayload { .. })
    }
}

/// Convenience alias for RPC results.
pub type RpcResult<T> = Result<T, RpcError>;
