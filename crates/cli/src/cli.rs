//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// V2X neighbor node - collects vehicle beacons for one window and prints a summary
#[derive(Parser, Debug)]
#[command(
    name = "v2x-neighbor",
    author,
    version,
    about = "V2X beacon aggregator: one window, one neighbor summary",
    long_about = "Listens for vehicle beacons on a local UDP endpoint, keeps the latest \n\
                  state per vehicle for one collection window, then prints a single \n\
                  JSON summary line with the vehicle count and the nearest vehicle.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "V2X_NEIGHBOR_VERBOSE")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "V2X_NEIGHBOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// `run` arguments when no subcommand is given
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Collect beacons for one window and emit the summary (default)
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults when absent
    #[arg(short, long, env = "V2X_NEIGHBOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override listen host
    #[arg(long, env = "V2X_NEIGHBOR_HOST")]
    pub host: Option<String>,

    /// Override listen port
    #[arg(long, env = "V2X_NEIGHBOR_PORT")]
    pub port: Option<u16>,

    /// Override collection window length in milliseconds
    #[arg(long, env = "V2X_NEIGHBOR_WINDOW_MS")]
    pub window_ms: Option<u64>,

    /// Override idle receive timeout in milliseconds
    #[arg(long, env = "V2X_NEIGHBOR_IDLE_TIMEOUT_MS")]
    pub idle_timeout_ms: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "V2X_NEIGHBOR_METRICS_PORT")]
    pub metrics_port: u16,
}

impl RunArgs {
    pub fn metrics_port(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
