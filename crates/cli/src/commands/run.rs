//! `run` command implementation.

use std::sync::Arc;

use tracing::{info, warn};

use config_loader::ConfigLoader;
use contracts::{CrawlerSettings, MetricSink};
use dispatcher::{DispatchError, Dispatcher, DispatcherConfig, InfluxSink, LogSink, RunSummary};

use crate::cli::{RunArgs, SinkKind};
use crate::error::{CliError, Result};
use crate::registry::build_registry;

/// Execute the `run` command
pub async fn run_crawl(args: &RunArgs) -> Result<()> {
    // Checked before any side effect, including database bootstrap
    if args.providers.is_empty() {
        return Err(DispatchError::NoSourcesSelected.into());
    }

    let settings = load_settings(args)?;
    info!(
        influx = %settings.influx.addr,
        database = %settings.influx.database,
        providers = ?args.providers,
        sink = ?args.sink,
        "Settings loaded"
    );

    let registry = build_registry(&settings)?;
    let config = DispatcherConfig::from(&settings.dispatch);

    let summary = match args.sink {
        SinkKind::Influx => {
            let sink = InfluxSink::new(&settings.influx, &settings.http).map_err(CliError::Sink)?;
            if settings.influx.create_database {
                sink.ensure_database().await.map_err(CliError::Sink)?;
            }
            let sink = Arc::new(sink);
            let dispatcher = Dispatcher::new(registry, Arc::clone(&sink)).with_config(config);
            let summary = dispatch(dispatcher, args).await?;
            let written = sink.metrics();
            info!(
                writes = written.write_count,
                failures = written.failure_count,
                points = written.points_written,
                "InfluxDB sink totals"
            );
            summary
        }
        SinkKind::Log => {
            let sink = Arc::new(LogSink::new("log"));
            dispatch(Dispatcher::new(registry, sink).with_config(config), args).await?
        }
    };

    print_summary(&summary);
    Ok(())
}

/// Load settings from file (or defaults) and apply CLI overrides
fn load_settings(args: &RunArgs) -> Result<CrawlerSettings> {
    let mut settings =
        ConfigLoader::load_or_default(Some(&args.config)).map_err(CliError::Settings)?;

    if let Some(ref addr) = args.influx_addr {
        info!(addr = %addr, "Overriding InfluxDB address from CLI");
        settings.influx.addr = addr.clone();
    }
    if let Some(ref database) = args.database {
        info!(database = %database, "Overriding database from CLI");
        settings.influx.database = database.clone();
    }
    if let Some(policy) = args.gather_policy {
        settings.dispatch.gather_policy = policy.into();
    }
    if let Some(secs) = args.unit_timeout {
        settings.dispatch.unit_timeout_secs = secs;
    }
    if args.reject_unknown {
        settings.dispatch.reject_unknown = true;
    }

    ConfigLoader::validate(&settings).map_err(CliError::Settings)?;
    Ok(settings)
}

async fn dispatch<S>(dispatcher: Dispatcher<S>, args: &RunArgs) -> Result<RunSummary>
where
    S: MetricSink + Sync + 'static,
{
    let shutdown = shutdown_signal();
    tokio::select! {
        result = dispatcher.run_selected(&args.providers) => Ok(result?),
        _ = shutdown => {
            warn!("Received shutdown signal, abandoning running providers");
            Err(anyhow::anyhow!("interrupted").into())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== Run Summary ===\n");
    println!(
        "  Launched: {}  Written: {}  Failed: {}  Skipped: {}",
        summary.launched, summary.written, summary.failed, summary.skipped
    );
    for (name, outcome) in &summary.outcomes {
        println!("  - {name:<20} {outcome}");
    }
    println!();
}
