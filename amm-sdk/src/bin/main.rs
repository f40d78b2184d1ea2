// CLI for AMM v4 pools
//
// Resolves pool keys, caches catalog entries, quotes swaps and deposits, and
// submits the combined buy + add-liquidity transaction.

mod commands;

use std::path::PathBuf;

use amm_v4_sdk::AppConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ammv4")]
#[command(about = "AMM v4 pool CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "ammv4.toml")]
    config: PathBuf,

    /// Override the RPC URL from the config
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Download the catalog entry for a market and cache it
    FetchPool(commands::fetch_pool::FetchPoolCmd),

    /// Resolve a pool's keys from chain state
    Resolve(commands::fetch_pool::ResolveCmd),

    /// Quote the configured swap and deposit without sending anything
    Quote(commands::quote::QuoteCmd),

    /// Build, sign and submit the buy + add-liquidity transaction
    Execute(commands::execute::ExecuteCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { force } = &cli.command {
        init_logging(cli.log_level.as_deref().unwrap_or("info"));
        return commands::utils::write_default_config(&cli.config, *force);
    }

    let mut config = if cli.config.exists() {
        AppConfig::load(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    init_logging(&config.log_level);
    if !cli.config.exists() {
        warn!("Config file not found, using defaults: {}", cli.config.display());
    }
    info!(rpc = %config.rpc_url, commitment = %config.commitment, "Starting ammv4");

    match cli.command {
        Commands::InitConfig { .. } => Ok(()),
        Commands::FetchPool(cmd) => commands::fetch_pool::fetch(cmd, &config).await,
        Commands::Resolve(cmd) => commands::fetch_pool::resolve(cmd, &config).await,
        Commands::Quote(cmd) => commands::quote::execute(cmd, &config).await,
        Commands::Execute(cmd) => commands::execute::execute(cmd, &config).await,
    }
}

fn init_logging(log_level: &str) {
    let level = log_level.parse().unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("amm_v4_sdk={},ammv4={}", level, level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
