//! Error types for building the announcement pipeline.
//!
//! Individual announcements never fail with an error; they end in an
//! [`Outcome`](crate::Outcome). These errors only arise at construction time.

use autotl_config::ConfigError;
use thiserror::Error;

/// Errors raised while assembling the pipeline.
#[derive(Debug, Error)]
pub enum AnnounceError {
    /// The supplied announcement settings were rejected.
    #[error("invalid announce configuration")]
    Config {
        /// Underlying validation failure.
        #[from]
        source: ConfigError,
    },
    /// A user filter is not a valid regular expression.
    #[error("invalid filter pattern")]
    InvalidFilter {
        /// Pattern as configured.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The announcement pattern could not be built for the configured site.
    #[error("invalid announcement pattern")]
    InvalidPattern {
        /// Site host the pattern was built for.
        site: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// Convenience alias for pipeline construction results.
pub type AnnounceResult<T> = Result<T, AnnounceError>;
