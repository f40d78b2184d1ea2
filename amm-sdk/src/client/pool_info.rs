use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    client::AccountReader,
    core::{PoolInfo, PoolKeys, SdkError, SdkResult},
    protocol::{mint_supply_and_decimals, token_account_amount, AmmStateV4, OpenOrdersState},
};

/// Snapshot the pool's reserves.
///
/// A reserve is the vault balance plus what the pool holds on the order book,
/// minus the pnl owed to the pool owner.
pub async fn fetch_pool_info<R: AccountReader + ?Sized>(
    reader: &R,
    keys: &PoolKeys,
) -> SdkResult<PoolInfo> {
    let addresses = [
        keys.id,
        keys.base_vault,
        keys.quote_vault,
        keys.open_orders,
        keys.lp_mint,
    ];
    let accounts = reader.fetch_multiple(&addresses).await?;
    if accounts.len() != addresses.len() {
        return Err(SdkError::Rpc(format!(
            "requested {} accounts, received {}",
            addresses.len(),
            accounts.len()
        )));
    }

    let mut data = Vec::with_capacity(addresses.len());
    for (address, account) in addresses.iter().zip(accounts) {
        match account {
            Some(bytes) => data.push(bytes),
            None if *address == keys.id => return Err(SdkError::PoolNotFound(keys.id)),
            None => return Err(SdkError::AccountNotFound(*address)),
        }
    }

    let pool = AmmStateV4::decode(&keys.id, &data[0])?;
    let base_vault = token_account_amount(&keys.base_vault, &data[1])?;
    let quote_vault = token_account_amount(&keys.quote_vault, &data[2])?;
    let open_orders = OpenOrdersState::decode(&keys.open_orders, &data[3])?;
    let (lp_supply, lp_decimals) = mint_supply_and_decimals(&keys.lp_mint, &data[4])?;

    let base_reserve = reserve(
        &keys.id,
        base_vault,
        open_orders.base_token_total,
        pool.base_need_take_pnl,
    )?;
    let quote_reserve = reserve(
        &keys.id,
        quote_vault,
        open_orders.quote_token_total,
        pool.quote_need_take_pnl,
    )?;

    debug!(
        pool = %keys.id,
        base_reserve,
        quote_reserve,
        lp_supply,
        status = pool.status,
        "Fetched pool info"
    );

    Ok(PoolInfo {
        status: pool.status,
        base_decimals: keys.base_decimals,
        quote_decimals: keys.quote_decimals,
        lp_decimals,
        base_reserve,
        quote_reserve,
        lp_supply,
    })
}

fn reserve(pool: &Pubkey, vault: u64, on_book: u64, need_take_pnl: u64) -> SdkResult<u64> {
    vault
        .checked_add(on_book)
        .map(|total| total.saturating_sub(need_take_pnl))
        .ok_or_else(|| SdkError::IllegalPoolState(format!("pool {} reserve overflows", pool)))
}
