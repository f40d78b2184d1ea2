// Combined buy + add-liquidity execution

use amm_v4_sdk::{
    client::fetch_pool_info, AppConfig, ExecuteKeyPair, FileKeyProvider, SdkError,
    TransactionAssembler,
};
use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use super::utils::{backend, info, pool_id, pool_source, success};

#[derive(Args)]
pub struct ExecuteCmd {
    /// Pool id (defaults to `pool.id`)
    #[arg(long)]
    pool: Option<String>,

    /// Build and print the transaction without submitting it
    #[arg(long)]
    dry_run: bool,
}

pub async fn execute(cmd: ExecuteCmd, config: &AppConfig) -> Result<()> {
    let pool_id = pool_id(cmd.pool.as_deref(), config)?;
    let backend = backend(config)?;

    let provider = FileKeyProvider::new(&config.paths.key_dir);
    let signers =
        ExecuteKeyPair::from_provider(&provider, &config.signers.buy, &config.signers.liquidity)
            .context("Failed to load signing keys")?;

    let keys = match pool_source(config, &backend).pool_keys(&pool_id).await {
        Ok(keys) => keys,
        Err(err @ (SdkError::PoolNotFound(_) | SdkError::MarketNotFound { .. })) => {
            warn!(pool = %pool_id, "Could not get pool info: {}", err);
            return Err(err.into());
        }
        Err(err) => {
            return Err(anyhow::Error::new(err).context(format!("Could not resolve pool {}", pool_id)))
        }
    };
    let pool = fetch_pool_info(&*backend, &keys).await?;

    let assembler = TransactionAssembler::new(backend.clone(), backend.clone())
        .with_options(config.send_options()?);
    let swap = config.swap_request()?;
    let liquidity = config.liquidity_request()?;

    let built = assembler
        .build(&keys, &pool, &swap, liquidity.as_ref(), &signers)
        .await?;
    for (buyer, quote) in &built.swaps {
        info(&format!(
            "{} swaps {} for at least {}",
            buyer, quote.amount_in, quote.min_amount_out
        ));
    }
    if let Some((provider, deposit)) = &built.deposit {
        info(&format!(
            "{} deposits {} and at most {}",
            provider, deposit.amount, deposit.max_another_amount
        ));
    }

    if cmd.dry_run {
        info(&format!(
            "Dry run: {} instructions, payer {}",
            built.instructions.len(),
            built.payer
        ));
        return Ok(());
    }

    info("Executing transaction...");
    let signature = assembler.submit(&built, &signers).await?;
    success(&format!("Transaction hash {}", signature));
    Ok(())
}
