pub mod assembler;
pub mod pool_info;
pub mod resolver;
pub mod rpc;
pub mod token_accounts;

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentLevel, hash::Hash, pubkey::Pubkey, signature::Keypair,
    signature::Signature, transaction::Transaction,
};

use crate::core::SdkResult;

pub use assembler::{BuiltTransaction, LiquidityRequest, SwapRequest, TransactionAssembler};
pub use pool_info::fetch_pool_info;
pub use resolver::{CatalogStore, OnChainPoolKeys, PoolKeySource};
pub use rpc::RpcBackend;
pub use token_accounts::{
    resolve_liquidity_accounts, resolve_swap_accounts, LiquidityTokenAccounts, SwapTokenAccounts,
};

/// Read access to raw account data
#[async_trait]
pub trait AccountReader: Send + Sync {
    /// `None` when the account does not exist
    async fn fetch(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>>;

    async fn fetch_multiple(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>> {
        let mut accounts = Vec::with_capacity(addresses.len());
        for address in addresses {
            accounts.push(self.fetch(address).await?);
        }
        Ok(accounts)
    }
}

#[async_trait]
impl<T: AccountReader + ?Sized> AccountReader for Arc<T> {
    async fn fetch(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        (**self).fetch(address).await
    }

    async fn fetch_multiple(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>> {
        (**self).fetch_multiple(addresses).await
    }
}

/// Locates or creates the token accounts a user trades through.
///
/// Both operations may write on-chain, paid and signed by `payer`.
#[async_trait]
pub trait TokenAccountResolver: Send + Sync {
    async fn get_or_create(&self, payer: &Keypair, owner: &Pubkey, mint: &Pubkey)
        -> SdkResult<Pubkey>;

    async fn create_wrapped_native(
        &self,
        payer: &Keypair,
        owner: &Pubkey,
        initial_lamports: u64,
    ) -> SdkResult<Pubkey>;
}

/// Submission settings applied to every transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentLevel,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: CommitmentLevel::Confirmed,
        }
    }
}

#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn latest_blockhash(&self) -> SdkResult<Hash>;

    /// Submit a fully signed transaction; failures surface as `SubmissionError`
    async fn send(&self, transaction: &Transaction, options: SendOptions) -> SdkResult<Signature>;
}
