//! Pool key resolution from on-chain state or from the local catalog cache.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::{
    client::AccountReader,
    core::{
        PoolKeys, SdkError, SdkResult, AMM_V4_PROGRAM_ID, LOOKUP_TABLE_ACCOUNT, MARKET_VERSION,
        POOL_VERSION,
    },
    protocol::{amm_authority, market_authority, AmmStateV4, MarketStateV3},
};

/// Anything that can produce the full key set of a pool
#[async_trait]
pub trait PoolKeySource: Send + Sync {
    async fn pool_keys(&self, pool_id: &Pubkey) -> SdkResult<PoolKeys>;
}

/// Resolves pool keys by decoding the pool and market accounts
pub struct OnChainPoolKeys<R> {
    reader: R,
    program_id: Pubkey,
}

impl<R: AccountReader> OnChainPoolKeys<R> {
    pub fn new(reader: R) -> Self {
        Self::with_program_id(reader, AMM_V4_PROGRAM_ID)
    }

    pub fn with_program_id(reader: R, program_id: Pubkey) -> Self {
        Self { reader, program_id }
    }

    pub async fn resolve(&self, pool_id: &Pubkey) -> SdkResult<PoolKeys> {
        let Some(pool_data) = self.reader.fetch(pool_id).await? else {
            warn!(pool = %pool_id, "Pool account not found");
            return Err(SdkError::PoolNotFound(*pool_id));
        };
        let pool = AmmStateV4::decode(pool_id, &pool_data)?;
        debug!(pool = %pool_id, market = %pool.market_id, status = pool.status, "Decoded pool state");

        let Some(market_data) = self.reader.fetch(&pool.market_id).await? else {
            warn!(pool = %pool_id, market = %pool.market_id, "Market account not found");
            return Err(SdkError::MarketNotFound {
                pool: *pool_id,
                market: pool.market_id,
            });
        };
        let market = MarketStateV3::decode(&pool.market_id, &market_data)?;
        if market.own_address != pool.market_id {
            warn!(
                pool = %pool_id,
                market = %pool.market_id,
                own_address = %market.own_address,
                "Market address mismatch"
            );
            return Err(SdkError::IllegalPoolState(format!(
                "pool {} references market {}, but that account records own address {}",
                pool_id, pool.market_id, market.own_address
            )));
        }

        let market_authority = market_authority(
            &market.own_address,
            market.vault_signer_nonce,
            &pool.market_program_id,
        )?;
        debug!(
            market = %market.own_address,
            nonce = market.vault_signer_nonce,
            authority = %market_authority,
            "Derived market authority"
        );

        let base_decimals = decimals(pool_id, "base", pool.base_decimal)?;
        let quote_decimals = decimals(pool_id, "quote", pool.quote_decimal)?;

        Ok(PoolKeys {
            id: *pool_id,
            base_mint: pool.base_mint,
            quote_mint: pool.quote_mint,
            lp_mint: pool.lp_mint,
            base_decimals,
            quote_decimals,
            // LP mints are created with the base mint's decimals
            lp_decimals: base_decimals,
            version: POOL_VERSION,
            program_id: self.program_id,
            authority: amm_authority(&self.program_id).0,
            base_vault: pool.base_vault,
            quote_vault: pool.quote_vault,
            lp_vault: pool.lp_vault,
            open_orders: pool.open_orders,
            target_orders: pool.target_orders,
            withdraw_queue: pool.withdraw_queue,
            market_version: MARKET_VERSION,
            market_program_id: pool.market_program_id,
            market_id: market.own_address,
            market_authority,
            market_base_vault: market.base_vault,
            market_quote_vault: market.quote_vault,
            market_bids: market.bids,
            market_asks: market.asks,
            market_event_queue: market.event_queue,
            lookup_table_account: LOOKUP_TABLE_ACCOUNT,
        })
    }
}

fn decimals(pool_id: &Pubkey, side: &str, value: u64) -> SdkResult<u8> {
    u8::try_from(value).map_err(|_| {
        SdkError::IllegalPoolState(format!(
            "pool {} reports {} {} decimals",
            pool_id, value, side
        ))
    })
}

#[async_trait]
impl<R: AccountReader> PoolKeySource for OnChainPoolKeys<R> {
    async fn pool_keys(&self, pool_id: &Pubkey) -> SdkResult<PoolKeys> {
        self.resolve(pool_id).await
    }
}

/// Directory of cached key sets, one `<address>.json` per pool id or market id
#[derive(Clone, Debug)]
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, address: &Pubkey) -> PathBuf {
        self.dir.join(format!("{}.json", address))
    }

    /// Load the entry cached under `address` (pool id or market id)
    pub async fn load(&self, address: &Pubkey) -> SdkResult<Option<PoolKeys>> {
        let path = self.path_for(address);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist `keys` under both its market id and its pool id
    pub async fn save(&self, keys: &PoolKeys) -> SdkResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = to_pretty_json(keys)?;

        let mut written = Vec::with_capacity(2);
        for address in [keys.market_id, keys.id] {
            let path = self.path_for(&address);
            tokio::fs::write(&path, &json).await?;
            debug!(path = %path.display(), "Saved pool keys");
            written.push(path);
        }
        Ok(written)
    }
}

#[async_trait]
impl PoolKeySource for CatalogStore {
    async fn pool_keys(&self, pool_id: &Pubkey) -> SdkResult<PoolKeys> {
        match self.load(pool_id).await? {
            Some(keys) if keys.id == *pool_id || keys.market_id == *pool_id => Ok(keys),
            Some(keys) => Err(SdkError::Catalog(format!(
                "{} holds keys for pool {}",
                self.path_for(pool_id).display(),
                keys.id
            ))),
            None => {
                warn!(pool = %pool_id, dir = %self.dir.display(), "Pool keys not cached");
                Err(SdkError::PoolNotFound(*pool_id))
            }
        }
    }
}

/// Pretty JSON with 4-space indentation
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> SdkResult<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
