//! # Seismograph CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Settings loading and validation
//! - One-shot concurrent crawl of the selected providers
//! - Provider listing

mod cli;
mod commands;
mod error;
mod registry;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cli::{Cli, Commands};
use commands::{run_crawl, run_list, run_validate};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_observability(&cli) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Seismograph crawler starting");

    let result = match &cli.command {
        Commands::Run(args) => run_crawl(args).await,
        Commands::List(args) => run_list(args),
        Commands::Validate(args) => run_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize logging and metrics based on CLI options
fn init_observability(cli: &Cli) -> anyhow::Result<()> {
    let metrics_port = match &cli.command {
        Commands::Run(args) if args.metrics_port != 0 => Some(args.metrics_port),
        _ => None,
    };

    let config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        quiet: cli.quiet,
        ..ObservabilityConfig::default()
    }
    .with_verbosity(cli.verbose);

    observability::init_with_config(config)
}
