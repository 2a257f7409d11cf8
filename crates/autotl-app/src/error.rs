//! # Design
//!
//! - Centralize application-level errors for bootstrap and commands.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::error::Error as _;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration values were missing or invalid.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: autotl_config::ConfigError,
    },
    /// Logging could not be initialised.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: autotl_telemetry::TelemetryError,
    },
    /// A daemon round trip failed.
    #[error("daemon operation failed")]
    Rpc {
        /// Operation identifier.
        operation: &'static str,
        /// Source RPC error.
        source: autotl_rpc::RpcError,
    },
    /// The announcement pipeline could not be built.
    #[error("announcement pipeline setup failed")]
    Announce {
        /// Operation identifier.
        operation: &'static str,
        /// Source pipeline error.
        source: autotl_announce::AnnounceError,
    },
    /// Local IO failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved, when there is one.
        path: Option<PathBuf>,
        /// Source IO error.
        source: io::Error,
    },
    /// Rendering command output failed.
    #[error("failed to render output")]
    Output {
        /// Source serialization error.
        source: serde_json::Error,
    },
    /// The announcement worker stopped abnormally.
    #[error("announcement worker failed")]
    Worker {
        /// Source join error.
        source: tokio::task::JoinError,
    },
}

impl AppError {
    /// Process exit code: 2 for configuration problems, 3 for operational
    /// failures.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Announce { .. } => 2,
            Self::Telemetry { .. }
            | Self::Rpc { .. }
            | Self::Io { .. }
            | Self::Output { .. }
            | Self::Worker { .. } => 3,
        }
    }

    /// Operation label carried by the error, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Config { operation, .. }
            | Self::Telemetry { operation, .. }
            | Self::Rpc { operation, .. }
            | Self::Announce { operation, .. }
            | Self::Io { operation, .. } => Some(*operation),
            Self::Output { .. } | Self::Worker { .. } => None,
        }
    }

    /// Message including every source in the chain, for operators.
    #[must_use]
    pub fn display_message(&self) -> String {
        let mut message = self.to_string();
        if let Some(operation) = self.operation() {
            let _ = write!(message, " ({operation})");
        }
        let mut source = self.source();
        while let Some(inner) = source {
            let _ = write!(message, ": {inner}");
            source = inner.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotl_config::ConfigError;
    use autotl_rpc::RpcError;

    #[test]
    fn config_errors_exit_with_validation_code() {
        let err = AppError::Config {
            operation: "config.announce",
            source: ConfigError::MissingField { field: "rss_key" },
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "configuration operation failed (config.announce): missing configuration field"
        );
    }

    #[test]
    fn daemon_errors_exit_with_failure_code() {
        let err = AppError::Rpc {
            operation: "torrent.list",
            source: RpcError::Auth { status: 401 },
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "daemon operation failed (torrent.list): rpc authentication rejected"
        );
    }

    #[test]
    fn io_errors_include_source_message() {
        let err = AppError::Io {
            operation: "announce.stdin",
            path: None,
            source: io::Error::other("broken pipe"),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().ends_with(": broken pipe"));
    }
}
