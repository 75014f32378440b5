use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use shared::config::load_config;
use shared::model::Device;
use shared::output::write_devices;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

/// Crawls a switched network's LLDP-reported topology over SSH and writes it
/// out as a JSON array of devices.
#[derive(Debug, Parser)]
#[command(name = "networkmap")]
#[command(bin_name = "networkmap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crawl a switched network's LLDP-reported topology over SSH", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    config: PathBuf,

    /// Raise the log level: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// UTC timer with millisecond precision, e.g. 2026-02-17T00:59:15.920Z.
struct MillisecondTime;

impl FormatTime for MillisecondTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = jiff::Zoned::now();
        write!(w, "{}", now.strftime("%Y-%m-%dT%H:%M:%S.%3fZ"))
    }
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {path}"))?;
            let file = Arc::new(file);
            tracing_subscriber::fmt()
                .with_timer(MillisecondTime)
                .with_env_filter(filter)
                .with_writer(move || file.clone())
                .with_target(false)
                .with_ansi(false)
                .compact()
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_timer(MillisecondTime)
                .with_env_filter(filter)
                .with_target(false)
                .compact()
                .init();
        }
    }

    Ok(())
}

/// Waits for SIGINT or SIGTERM, then cancels `token` so the crawl controller
/// stops launching new workers and winds down in-flight ones.
async fn watch_for_shutdown(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, winding down in-flight workers"),
        _ = terminate => tracing::info!("received SIGTERM, winding down in-flight workers"),
    }

    token.cancel();
}

/// Returns `Ok(true)` on a clean, uninterrupted run and `Ok(false)` when the
/// crawl was cut short by a shutdown signal; both still write whatever was
/// explored. Only configuration and output-file errors are `Err`.
async fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    init_logging(cli.verbose, config.networkmap.log_file.as_deref())?;

    tracing::info!(config = %cli.config.display(), source = %config.networkmap.source_address, "starting crawl");

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn(watch_for_shutdown(shutdown.clone()));

    let seed = Device::stub(config.networkmap.source_address.clone());
    let explored = crawl::run_crawl(&config, seed, shutdown.clone()).await;

    watcher.abort();

    let devices: Vec<Device> = explored.iter().map(|entry| entry.value().clone()).collect();
    let device_count = devices.len();

    write_devices(&devices, &config.networkmap.output_file)
        .with_context(|| format!("failed to write output file {}", config.networkmap.output_file))?;

    tracing::info!(devices = device_count, "crawl complete, topology written");

    Ok(!shutdown.is_cancelled())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::warn!("exiting non-zero: crawl was interrupted by a shutdown signal");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
