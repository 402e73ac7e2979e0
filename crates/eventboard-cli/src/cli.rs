//! CLI command definitions and argument parsing.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Eventboard CLI - Dashboard views over event and supplier data.
#[derive(Debug, Parser)]
#[command(name = "eventboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file holding events, suppliers, items and ratings
    #[arg(short, long, global = true, env = "EVENTBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long, global = true, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events in progress
    InProgress,

    /// Classify events by time (all classes unless one is named)
    Classify(ClassifyArgs),

    /// Show supplier costs per event
    Costs(CostsArgs),

    /// Show mean supplier ratings for an event
    Rating(RatingArgs),

    /// Report data integrity problems
    Integrity,

    /// Reload the data file periodically and redisplay the dashboard
    Watch(WatchArgs),

    /// Show whether push notifications are configured
    NotifyStatus,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Class name (in_progress, upcoming, past)
    pub class: Option<String>,
}

/// Arguments for the costs command.
#[derive(Debug, Parser)]
pub struct CostsArgs {
    /// Only show this event
    #[arg(short, long)]
    pub event: Option<u64>,
}

/// Arguments for the rating command.
#[derive(Debug, Parser)]
pub struct RatingArgs {
    /// Event the ratings were given in
    #[arg(short, long)]
    pub event: u64,

    /// Only show this supplier
    #[arg(short, long)]
    pub supplier: Option<u64>,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Refresh interval in seconds (overrides the config)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Stop after this many refreshes
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 instant '{}': {}", s, e))
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
