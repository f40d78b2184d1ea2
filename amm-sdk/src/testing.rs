//! In-memory chain and pool fixtures for exercising resolution and assembly
//! without a cluster.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Keypair, signature::Signature, transaction::Transaction,
};

use crate::{
    client::{AccountReader, SendOptions, TokenAccountResolver, TransactionSubmitter},
    core::{
        PoolInfo, PoolKeys, SdkError, SdkResult, AMM_V4_PROGRAM_ID, LOOKUP_TABLE_ACCOUNT,
        MARKET_PROGRAM_ID, MARKET_VERSION, MINT_LEN, POOL_VERSION, TOKEN_ACCOUNT_LEN,
    },
    instructions::associated_account,
    protocol::{
        amm_authority, find_market_authority, AmmFees, AmmStateV4, MarketStateV3,
        OpenOrdersState,
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Key set with fresh unique addresses
pub fn sample_pool_keys() -> PoolKeys {
    let k = Pubkey::new_unique;
    PoolKeys {
        id: k(),
        base_mint: k(),
        quote_mint: k(),
        lp_mint: k(),
        base_decimals: 6,
        quote_decimals: 6,
        lp_decimals: 6,
        version: POOL_VERSION,
        program_id: AMM_V4_PROGRAM_ID,
        authority: amm_authority(&AMM_V4_PROGRAM_ID).0,
        base_vault: k(),
        quote_vault: k(),
        lp_vault: k(),
        open_orders: k(),
        target_orders: k(),
        withdraw_queue: k(),
        market_version: MARKET_VERSION,
        market_program_id: MARKET_PROGRAM_ID,
        market_id: k(),
        market_authority: k(),
        market_base_vault: k(),
        market_quote_vault: k(),
        market_bids: k(),
        market_asks: k(),
        market_event_queue: k(),
        lookup_table_account: LOOKUP_TABLE_ACCOUNT,
    }
}

pub fn sample_pool_info(base_reserve: u64, quote_reserve: u64) -> PoolInfo {
    PoolInfo {
        status: 6,
        base_decimals: 6,
        quote_decimals: 6,
        lp_decimals: 6,
        base_reserve,
        quote_reserve,
        lp_supply: 0,
    }
}

pub fn token_account_data(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Vec<u8> {
    let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
    data[..32].copy_from_slice(mint.as_ref());
    data[32..64].copy_from_slice(owner.as_ref());
    data[64..72].copy_from_slice(&amount.to_le_bytes());
    // initialized
    data[108] = 1;
    data
}

pub fn mint_data(supply: u64, decimals: u8) -> Vec<u8> {
    let mut data = vec![0u8; MINT_LEN];
    data[36..44].copy_from_slice(&supply.to_le_bytes());
    data[44] = decimals;
    data[45] = 1;
    data
}

/// Consistent pool and market state pair with a valid vault signer nonce
#[derive(Clone, Debug)]
pub struct PoolFixture {
    pub pool_id: Pubkey,
    pub pool: AmmStateV4,
    pub market: MarketStateV3,
}

impl PoolFixture {
    pub fn new(base_mint: Pubkey, quote_mint: Pubkey) -> SdkResult<Self> {
        let k = Pubkey::new_unique;
        let market_id = k();
        let (_, nonce) = find_market_authority(&market_id, &MARKET_PROGRAM_ID)?;

        let pool = AmmStateV4 {
            status: 6,
            nonce: amm_authority(&AMM_V4_PROGRAM_ID).1 as u64,
            base_decimal: 9,
            quote_decimal: 6,
            fees: AmmFees {
                trade_fee_numerator: 25,
                trade_fee_denominator: 10_000,
                ..AmmFees::default()
            },
            base_vault: k(),
            quote_vault: k(),
            base_mint,
            quote_mint,
            lp_mint: k(),
            open_orders: k(),
            market_id,
            market_program_id: MARKET_PROGRAM_ID,
            target_orders: k(),
            withdraw_queue: k(),
            lp_vault: k(),
            owner: k(),
            ..AmmStateV4::default()
        };
        let market = MarketStateV3 {
            own_address: market_id,
            vault_signer_nonce: nonce,
            base_mint,
            quote_mint,
            base_vault: k(),
            quote_vault: k(),
            request_queue: k(),
            event_queue: k(),
            bids: k(),
            asks: k(),
            ..MarketStateV3::default()
        };

        Ok(Self {
            pool_id: k(),
            pool,
            market,
        })
    }

    /// Store the pool and market accounts
    pub fn install(&self, chain: &InMemoryChain) {
        chain.insert(self.pool_id, self.pool.encode());
        chain.insert(self.market.own_address, self.market.encode());
    }

    /// Store the vaults, open orders and LP mint a reserve snapshot reads
    pub fn install_reserves(&self, chain: &InMemoryChain, base_vault: u64, quote_vault: u64) {
        let authority = amm_authority(&AMM_V4_PROGRAM_ID).0;
        chain.insert(
            self.pool.base_vault,
            token_account_data(&self.pool.base_mint, &authority, base_vault),
        );
        chain.insert(
            self.pool.quote_vault,
            token_account_data(&self.pool.quote_mint, &authority, quote_vault),
        );
        chain.insert(self.pool.open_orders, OpenOrdersState::default().encode());
        chain.insert(self.pool.lp_mint, mint_data(1_000_000, 9));
    }
}

/// Account store plus recorders for every chain-facing call
#[derive(Default)]
pub struct InMemoryChain {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    created: Mutex<Vec<(Pubkey, Pubkey)>>,
    wrapped: Mutex<Vec<(Pubkey, u64)>>,
    sent: Mutex<Vec<(Transaction, SendOptions)>>,
    reject_sends: Mutex<Option<String>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: Pubkey, data: Vec<u8>) {
        lock(&self.accounts).insert(address, data);
    }

    pub fn remove(&self, address: &Pubkey) {
        lock(&self.accounts).remove(address);
    }

    /// Every (owner, mint) passed to `get_or_create`, in call order
    pub fn created_accounts(&self) -> Vec<(Pubkey, Pubkey)> {
        lock(&self.created).clone()
    }

    pub fn wrapped_accounts(&self) -> Vec<(Pubkey, u64)> {
        lock(&self.wrapped).clone()
    }

    pub fn sent_transactions(&self) -> Vec<(Transaction, SendOptions)> {
        lock(&self.sent).clone()
    }

    /// Make every later `send` fail with `reason`
    pub fn reject_sends(&self, reason: &str) {
        *lock(&self.reject_sends) = Some(reason.to_string());
    }
}

#[async_trait]
impl AccountReader for InMemoryChain {
    async fn fetch(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        Ok(lock(&self.accounts).get(address).cloned())
    }
}

#[async_trait]
impl TokenAccountResolver for InMemoryChain {
    async fn get_or_create(
        &self,
        _payer: &Keypair,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> SdkResult<Pubkey> {
        lock(&self.created).push((*owner, *mint));
        let address = associated_account(owner, mint);
        lock(&self.accounts)
            .entry(address)
            .or_insert_with(|| token_account_data(mint, owner, 0));
        Ok(address)
    }

    async fn create_wrapped_native(
        &self,
        _payer: &Keypair,
        owner: &Pubkey,
        initial_lamports: u64,
    ) -> SdkResult<Pubkey> {
        lock(&self.wrapped).push((*owner, initial_lamports));
        let native_mint = spl_token::native_mint::id();
        let address = associated_account(owner, &native_mint);
        lock(&self.accounts).insert(
            address,
            token_account_data(&native_mint, owner, initial_lamports),
        );
        Ok(address)
    }
}

#[async_trait]
impl TransactionSubmitter for InMemoryChain {
    async fn latest_blockhash(&self) -> SdkResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send(&self, transaction: &Transaction, options: SendOptions) -> SdkResult<Signature> {
        if let Some(reason) = lock(&self.reject_sends).clone() {
            return Err(SdkError::SubmissionError(reason));
        }
        if !transaction.is_signed() {
            return Err(SdkError::SubmissionError(
                "transaction is missing signatures".to_string(),
            ));
        }
        lock(&self.sent).push((transaction.clone(), options));
        transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| SdkError::SubmissionError("transaction has no signatures".to_string()))
    }
}
