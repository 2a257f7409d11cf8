//! Output renderers and formatting helpers for daemon commands.

use std::fmt::Write as _;

use autotl_rpc::{Torrent, TorrentAdded};
use chrono::DateTime;
use clap::ValueEnum;

use crate::error::{AppError, AppResult};

/// Output format for commands that render structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for humans.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Render a torrent list.
///
/// # Errors
///
/// Returns [`AppError::Output`] if JSON serialization fails.
pub fn render_torrent_list(torrents: &[Torrent], format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => to_json(torrents),
        OutputFormat::Table => {
            let mut text = format!(
                "{:>5} {:<12} {:>6} {:<16} NAME\n",
                "ID", "STATUS", "DONE", "ADDED"
            );
            for torrent in torrents {
                let _ = write!(
                    text,
                    "{:>5} {:<12} {:>6} {:<16} {}",
                    torrent.id,
                    status_label(torrent.status),
                    format_progress(torrent.percent_done),
                    format_added(torrent.added_date),
                    torrent.name
                );
                if torrent.error != 0 {
                    let _ = write!(text, " [error: {}]", torrent.error_string);
                }
                text.push('\n');
            }
            Ok(text)
        }
    }
}

/// Render the torrent returned by an add.
///
/// # Errors
///
/// Returns [`AppError::Output`] if JSON serialization fails.
pub fn render_added(added: &TorrentAdded, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => to_json(added),
        OutputFormat::Table => Ok(format!(
            "added {} (id {}, hash {})\n",
            added.name, added.id, added.hash_string
        )),
    }
}

/// Label for a daemon status code.
#[must_use]
pub const fn status_label(code: i64) -> &'static str {
    match code {
        0 => "stopped",
        1 => "check-wait",
        2 => "checking",
        3 => "download-wait",
        4 => "downloading",
        5 => "seed-wait",
        6 => "seeding",
        _ => "unknown",
    }
}

fn format_progress(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn format_added(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let mut text =
        serde_json::to_string_pretty(value).map_err(|source| AppError::Output { source })?;
    text.push('\n');
    Ok(text)
}
