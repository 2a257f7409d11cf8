//! Argument parsing and command dispatch.

use std::time::Duration;

use autotl_config::{
    AnnounceConfig, AppConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PASSWORD,
    DEFAULT_SETTLE_DELAY_SECS, DEFAULT_SITE, DEFAULT_TRANSMISSION_URL, DEFAULT_USERNAME,
    DaemonConfig, parse_filter_list,
};
use autotl_rpc::{SortDirection, SortField};
use autotl_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::bootstrap::{DEFAULT_QUEUE_CAPACITY, connect, run_watch};
use crate::commands::{self, AddOptions, AddSource};
use crate::error::{AppError, AppResult};
use crate::output::OutputFormat;

/// Parse arguments, execute the requested command, and return the process
/// exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if logging, configuration, or the selected command fails.
pub async fn execute(cli: Cli) -> AppResult<()> {
    init_logging(&cli.logging_config()).map_err(|source| AppError::Telemetry {
        operation: "telemetry.init",
        source,
    })?;
    let daemon = cli.daemon_config()?;

    match cli.command {
        Command::Watch(args) => {
            let config = AppConfig::new(daemon, args.announce_config())
                .map_err(|source| AppError::Config {
                    operation: "config.announce",
                    source,
                })?;
            run_watch(&config, args.queue_capacity).await?;
        }
        Command::List(args) => {
            let direction = if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let client = connect(&daemon)?;
            print!(
                "{}",
                commands::list(&client, args.sort, direction, args.output).await?
            );
        }
        Command::Add(args) => {
            let client = connect(&daemon)?;
            let options = AddOptions {
                paused: args.paused,
                download_dir: args.download_dir,
            };
            let source = AddSource::classify(&args.source);
            print!(
                "{}",
                commands::add(&client, &source, &options, args.output).await?
            );
        }
        Command::Start(args) => {
            let client = connect(&daemon)?;
            println!("{}", commands::start(&client, args.id).await?);
        }
        Command::Stop(args) => {
            let client = connect(&daemon)?;
            println!("{}", commands::stop(&client, args.id).await?);
        }
        Command::Remove(args) => {
            let client = connect(&daemon)?;
            println!(
                "{}",
                commands::remove(&client, args.id, args.delete_data).await?
            );
        }
    }
    Ok(())
}

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(
    name = "autotl",
    version,
    about = "Adds announced torrents to a Transmission daemon"
)]
pub struct Cli {
    /// Base URL of the Transmission daemon.
    #[arg(
        long,
        global = true,
        env = "AUTOTL_TRANSMISSION_URL",
        default_value = DEFAULT_TRANSMISSION_URL
    )]
    pub transmission_url: String,
    /// RPC username; leave empty to disable authentication.
    #[arg(
        long,
        global = true,
        env = "AUTOTL_TRANSMISSION_USER",
        default_value = DEFAULT_USERNAME
    )]
    pub transmission_user: String,
    /// RPC password.
    #[arg(
        long,
        global = true,
        env = "AUTOTL_TRANSMISSION_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub transmission_password: String,
    /// Upper bound in seconds for every daemon request.
    #[arg(
        long,
        global = true,
        env = "AUTOTL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
    )]
    pub timeout: u64,
    /// Log level or filter directive; `RUST_LOG` takes precedence.
    #[arg(
        long,
        global = true,
        env = "AUTOTL_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub log_level: String,
    /// Log output format; defaults to pretty in debug builds and JSON otherwise.
    #[arg(long, global = true, env = "AUTOTL_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormatArg>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn logging_config(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        }
    }

    fn daemon_config(&self) -> AppResult<DaemonConfig> {
        DaemonConfig::new(
            &self.transmission_url,
            self.transmission_user.clone(),
            self.transmission_password.clone(),
            self.timeout,
        )
        .map_err(|source| AppError::Config {
            operation: "config.daemon",
            source,
        })
    }
}

/// Log format choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per record.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read announcement lines from stdin and add matching torrents.
    Watch(WatchArgs),
    /// List torrents known to the daemon.
    List(ListArgs),
    /// Add a torrent from a magnet link, URL, local file, or daemon-side path.
    Add(AddArgs),
    /// Start a torrent.
    Start(IdArgs),
    /// Stop a torrent.
    Stop(IdArgs),
    /// Remove a torrent.
    Remove(RemoveArgs),
}

/// Arguments for `watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Per-user key embedded in download links.
    #[arg(long, env = "AUTOTL_RSS_KEY", hide_env_values = true)]
    pub rss_key: Option<String>,
    /// Whitespace-separated filter patterns; any match accepts a torrent.
    #[arg(long, env = "AUTOTL_FILTERS")]
    pub filters: Option<String>,
    /// Add matched torrents paused.
    #[arg(long, env = "AUTOTL_ADD_PAUSED")]
    pub add_paused: bool,
    /// Seconds to wait before submitting an add.
    #[arg(long, env = "AUTOTL_SETTLE_DELAY_SECS", default_value_t = DEFAULT_SETTLE_DELAY_SECS)]
    pub settle_delay_secs: u64,
    /// Download directory applied to every add.
    #[arg(long, env = "AUTOTL_DOWNLOAD_DIR")]
    pub download_dir: Option<String>,
    /// Tracker host publishing the announcements.
    #[arg(long, env = "AUTOTL_SITE", default_value = DEFAULT_SITE)]
    pub site: String,
    /// Announcements buffered ahead of the pipeline.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

impl WatchArgs {
    /// Announcement settings described by these arguments.
    #[must_use]
    pub fn announce_config(&self) -> AnnounceConfig {
        let filters = self
            .filters
            .as_deref()
            .map(parse_filter_list)
            .unwrap_or_default();
        let mut config = AnnounceConfig::new(self.rss_key.clone().unwrap_or_default(), filters);
        config.site.clone_from(&self.site);
        config.add_paused = self.add_paused;
        config.settle_delay = Duration::from_secs(self.settle_delay_secs);
        config.download_dir.clone_from(&self.download_dir);
        config
    }
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Field to sort by: `id`, `name`, or `added-date`.
    #[arg(long, default_value_t = SortField::Id)]
    pub sort: SortField,
    /// Sort in descending order.
    #[arg(long)]
    pub desc: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Arguments for `add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Magnet link, URL, local `.torrent` file, or path on the daemon host.
    pub source: String,
    /// Add without starting.
    #[arg(long)]
    pub paused: bool,
    /// Download directory override.
    #[arg(long)]
    pub download_dir: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Arguments naming a single torrent.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Daemon-local torrent id.
    pub id: i64,
}

/// Arguments for `remove`.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Daemon-local torrent id.
    pub id: i64,
    /// Also delete downloaded data.
    #[arg(long)]
    pub delete_data: bool,
}
