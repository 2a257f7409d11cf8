#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Typed, immutable configuration consumed by the RPC client and the
//! announcement pipeline.
//!
//! Layout: `model.rs` (config values), `validate.rs` (parsing/validation
//! helpers), `defaults.rs` (default values), `error.rs` (error types).

mod defaults;
pub mod error;
pub mod model;
pub mod validate;

pub use defaults::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PASSWORD, DEFAULT_SETTLE_DELAY_SECS, DEFAULT_SITE,
    DEFAULT_TRANSMISSION_URL, DEFAULT_USERNAME,
};
pub use error::{ConfigError, ConfigResult};
pub use model::{AnnounceConfig, AppConfig, DaemonConfig};
pub use validate::parse_filter_list;
