// Quote command

use amm_v4_sdk::{
    client::fetch_pool_info,
    protocol::{compute_amount_out, compute_another_amount},
    AppConfig,
};
use anyhow::{Context, Result};
use clap::Args;

use super::utils::{backend, info, pool_id, pool_source};

#[derive(Args)]
pub struct QuoteCmd {
    /// Pool id (defaults to `pool.id`)
    #[arg(long)]
    pool: Option<String>,

    /// Swap input amount (defaults to `swap.amount`)
    #[arg(long)]
    amount: Option<String>,
}

pub async fn execute(cmd: QuoteCmd, config: &AppConfig) -> Result<()> {
    let pool_id = pool_id(cmd.pool.as_deref(), config)?;
    let backend = backend(config)?;

    let keys = pool_source(config, &backend)
        .pool_keys(&pool_id)
        .await
        .with_context(|| format!("Could not get pool keys for {}", pool_id))?;
    let pool = fetch_pool_info(&*backend, &keys).await?;
    info(&format!(
        "Pool {}: base reserve {}, quote reserve {}",
        keys.id, pool.base_reserve, pool.quote_reserve
    ));

    let mut swap = config.swap_request()?;
    if let Some(amount) = cmd.amount {
        swap.amount_in = amount;
    }
    let quote = compute_amount_out(&keys, &pool, &swap.amount_in, &swap.token_out, swap.slippage)?;
    println!("Swap in:          {}", quote.amount_in);
    println!("Expected out:     {}", quote.amount_out);
    println!("Minimum out:      {} (slippage {})", quote.min_amount_out, swap.slippage);

    if let Some(deposit) = config.liquidity_request()? {
        let token_b = keys.mint(keys.side_of(&deposit.token_a)?.opposite());
        let amounts = compute_another_amount(
            &keys,
            &pool,
            &deposit.token_a,
            &deposit.amount_a,
            &token_b,
            deposit.slippage,
        )?;
        println!("Deposit:          {}", amounts.amount);
        println!("Paired amount:    {}", amounts.another_amount);
        println!("Paired maximum:   {} (slippage {})", amounts.max_another_amount, deposit.slippage);
    }
    Ok(())
}
