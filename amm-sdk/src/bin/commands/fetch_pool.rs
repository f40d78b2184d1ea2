// Pool key lookup commands

use amm_v4_sdk::{catalog::CatalogFetcher, AppConfig, CatalogStore, OnChainPoolKeys};
use anyhow::{Context, Result};
use clap::Args;

use super::utils::{backend, info, parse_pubkey, pool_id, success};

#[derive(Args)]
pub struct FetchPoolCmd {
    /// Market id to look up (defaults to `pool.market_id`)
    #[arg(long)]
    market: Option<String>,

    /// Catalog URL (defaults to `catalog.url`)
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args)]
pub struct ResolveCmd {
    /// Pool id (defaults to `pool.id`)
    #[arg(long)]
    pool: Option<String>,

    /// Also cache the resolved keys in the pool info directory
    #[arg(long)]
    save: bool,
}

pub async fn fetch(cmd: FetchPoolCmd, config: &AppConfig) -> Result<()> {
    let market_id = match cmd.market.as_deref() {
        Some(market) => parse_pubkey(market)?,
        None => config.market_id()?,
    };
    let url = cmd.url.unwrap_or_else(|| config.catalog.url.clone());

    info(&format!("Looking up market {} in {}", market_id, url));
    let fetcher = CatalogFetcher::new(url, CatalogStore::new(&config.paths.pool_info_dir));
    let (keys, written) = fetcher
        .fetch_and_save(&market_id)
        .await
        .with_context(|| format!("Failed to fetch pool info for market {}", market_id))?;

    for path in written {
        success(&format!("Saved pool {} to {}", keys.id, path.display()));
    }
    Ok(())
}

pub async fn resolve(cmd: ResolveCmd, config: &AppConfig) -> Result<()> {
    let pool_id = pool_id(cmd.pool.as_deref(), config)?;
    let backend = backend(config)?;

    let keys = OnChainPoolKeys::new(backend.clone())
        .resolve(&pool_id)
        .await
        .with_context(|| format!("Could not resolve pool {}", pool_id))?;
    println!("{}", serde_json::to_string_pretty(&keys)?);

    if cmd.save {
        let written = CatalogStore::new(&config.paths.pool_info_dir)
            .save(&keys)
            .await?;
        for path in written {
            success(&format!("Saved pool {} to {}", keys.id, path.display()));
        }
    }
    Ok(())
}
