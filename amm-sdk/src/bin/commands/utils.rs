// Utility functions for CLI commands

use std::{path::Path, str::FromStr, sync::Arc};

use amm_v4_sdk::{
    config::PoolSource, AppConfig, CatalogStore, OnChainPoolKeys, PoolKeySource, RpcBackend,
};
use anyhow::{bail, Context, Result};
use solana_sdk::pubkey::Pubkey;

pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).with_context(|| format!("Invalid public key '{}'", s))
}

/// Pool id from the flag, falling back to the config
pub fn pool_id(flag: Option<&str>, config: &AppConfig) -> Result<Pubkey> {
    match flag {
        Some(id) => parse_pubkey(id),
        None => Ok(config.pool_id()?),
    }
}

pub fn backend(config: &AppConfig) -> Result<Arc<RpcBackend>> {
    let commitment = config.commitment_config()?;
    Ok(Arc::new(RpcBackend::new(&config.rpc_url, commitment)))
}

/// Key source selected by `pool.source`
pub fn pool_source(config: &AppConfig, backend: &Arc<RpcBackend>) -> Box<dyn PoolKeySource> {
    match config.pool.source {
        PoolSource::OnChain => Box::new(OnChainPoolKeys::new(backend.clone())),
        PoolSource::Catalog => Box::new(CatalogStore::new(&config.paths.pool_info_dir)),
    }
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }
    AppConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}

/// Print success message
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}
