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

//! Client for the Transmission daemon's JSON-over-HTTP control protocol.
//!
//! Layout: `codec.rs` (command/response DTOs and wire encoding), `session.rs`
//! (HTTP transport with session-id negotiation), `service.rs` (typed daemon
//! operations), `sort.rs` (torrent list ordering), `error.rs` (error taxonomy).

pub mod codec;
pub mod error;
pub mod service;
pub mod session;
pub mod sort;

pub use codec::{Arguments, RpcCommand, TORRENT_FIELDS, Torrent, TorrentAdded};
pub use error::{RpcError, RpcResult};
pub use service::{AddOptions, TorrentDaemon, TransmissionClient};
pub use session::{Credentials, RPC_PATH, SESSION_ID_HEADER, SessionClient};
pub use sort::{SortDirection, SortField, sort_torrents};
