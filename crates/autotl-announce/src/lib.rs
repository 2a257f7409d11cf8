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

//! Turns raw announcement lines into paused-or-running downloads on the
//! daemon.
//!
//! Layout: `parse.rs` (announcement pattern), `filter.rs` (user and language
//! filters), `link.rs` (name normalisation and download links),
//! `inflight.rs` (per-name locks), `pipeline.rs` (per-announcement state
//! machine), `worker.rs` (channel consumer), `error.rs` (error types).

pub mod error;
pub mod filter;
pub mod inflight;
pub mod link;
pub mod parse;
pub mod pipeline;
pub mod worker;

pub use error::{AnnounceError, AnnounceResult};
pub use filter::{BLOCKED_LANGUAGE, FilterSet, contains_blocked_language};
pub use inflight::{InflightClaim, InflightNames};
pub use link::{download_link, normalize_name};
pub use parse::{Announcement, AnnouncementParser};
pub use pipeline::{Outcome, Pipeline, Rejection};
pub use worker::{AnnouncementWorker, WorkerSummary};
