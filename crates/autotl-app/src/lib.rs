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

//! Wires configuration, logging, the daemon client, and the announcement
//! pipeline into the `autotl` binary.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `bootstrap.rs`: the `watch` workflow
//! - `commands.rs`: one-shot daemon commands
//! - `source.rs`: line source feeding the announcement channel
//! - `output.rs`: table and JSON renderers
//! - `error.rs`: application error type and exit codes

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod source;

pub use cli::{Cli, run};
pub use error::{AppError, AppResult};
