//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Seismograph - Bitcoin market and network-status crawler
#[derive(Parser, Debug)]
#[command(
    name = "seismograph",
    author,
    version,
    about = "Retrieve quantitative data from Bitcoin API providers",
    long_about = "Crawls Bitcoin price and network-status APIs and writes normalized \n\
                  points to InfluxDB. Each run launches the selected providers \n\
                  concurrently and exits once all of them have finished."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SEISMOGRAPH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SEISMOGRAPH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the selected providers once and write their points
    Run(RunArgs),

    /// List registered provider names
    List(ListArgs),

    /// Validate a settings file without crawling
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Provider to run; repeat or comma-separate for several
    #[arg(short, long = "provider", value_name = "PROVIDER", value_delimiter = ',')]
    pub providers: Vec<String>,

    /// Path to settings file (TOML or JSON); defaults apply when absent
    #[arg(
        short,
        long,
        default_value = "seismograph.toml",
        env = "SEISMOGRAPH_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the InfluxDB address
    #[arg(long, env = "SEISMOGRAPH_INFLUX_ADDR")]
    pub influx_addr: Option<String>,

    /// Override the InfluxDB database
    #[arg(long, env = "SEISMOGRAPH_DATABASE")]
    pub database: Option<String>,

    /// Where points go
    #[arg(long, value_enum, default_value = "influx")]
    pub sink: SinkKind,

    /// Override how blockchain.info treats a failing endpoint
    #[arg(long, value_enum)]
    pub gather_policy: Option<GatherPolicyArg>,

    /// Per-provider timeout in seconds (0 = no timeout)
    #[arg(long, env = "SEISMOGRAPH_UNIT_TIMEOUT")]
    pub unit_timeout: Option<u64>,

    /// Fail instead of skipping unknown provider names
    #[arg(long)]
    pub reject_unknown: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SEISMOGRAPH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `list` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to settings file to validate
    #[arg(short, long, default_value = "seismograph.toml")]
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

/// Sink selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// InfluxDB 1.x over HTTP
    #[default]
    Influx,
    /// Log a summary of every batch (dry run)
    Log,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatherPolicyArg {
    Strict,
    Lenient,
}

impl From<GatherPolicyArg> for contracts::GatherPolicy {
    fn from(policy: GatherPolicyArg) -> Self {
        match policy {
            GatherPolicyArg::Strict => Self::Strict,
            GatherPolicyArg::Lenient => Self::Lenient,
        }
    }
}
