//! Paydash main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use paydash_client::DashboardClient;
use paydash_config::{Config, ConfigError};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "paydash")]
#[command(author = "Paydash Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight payments transactions dashboard API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server (default)
    Serve,
    /// Fetch both endpoints from a running server and report what came back
    Check,
    /// Print the default configuration file
    DefaultConfig,
}

/// Recoverable errors (a missing file) fall back to defaults; the rest are fatal.
fn resolve_config(loaded: Result<Config, ConfigError>, path: &Path) -> anyhow::Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if e.is_recoverable() => {
            log::warn!("{}, using defaults", e.to_details());
            Ok(Config::default())
        }
        Err(e) => {
            log::error!("{}", e.to_details());
            Err(anyhow::anyhow!("{}", e.to_details()))
                .with_context(|| format!("failed to load {}", path.display()))
        }
    }
}

async fn check(config: &Config) -> anyhow::Result<()> {
    let client = DashboardClient::from_config(config);
    log::info!("Checking API at {}", client.fetcher().base_url());

    let transactions = client.transactions().await?;
    log::info!("Received {} transactions", transactions.len());

    let stats = client.stats().await?;
    log::info!(
        "Total balance: {}, deposited today: {}",
        stats.total_balance, stats.today_deposited
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::DefaultConfig) = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // The log level comes from the file, so read it before initializing.
    let loaded = Config::load(&args.config);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let config = resolve_config(loaded, &args.config)?;

    let rt = Runtime::new()?;
    rt.block_on(async {
        match args.command {
            Some(Command::Check) => check(&config).await,
            _ => paydash_api::start_server(config).await,
        }
    })
}
