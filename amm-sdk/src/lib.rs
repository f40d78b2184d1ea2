//! AMM v4 SDK
//!
//! Client-side tooling for constant-product AMM v4 pools:
//! - Decoding pool, market and open-orders accounts
//! - Resolving a pool's full key set from chain state or a cached catalog
//! - Quoting swaps and balanced deposits under a slippage bound
//! - Encoding swap and add-liquidity instructions
//! - Packing every signer's instructions into one atomic transaction

pub mod catalog;
pub mod client;
pub mod config;
pub mod core;
pub mod instructions;
pub mod keys;
pub mod prelude;
pub mod protocol;
pub mod testing;

pub use crate::core::{
    ExecuteKeyPair, PoolInfo, PoolKeys, PoolSide, SdkError, SdkResult, Slippage, TokenAmount,
    TokenRoute,
};
pub use catalog::{CatalogFetcher, LiquidityCatalog};
pub use client::{
    AccountReader, CatalogStore, LiquidityRequest, OnChainPoolKeys, PoolKeySource, RpcBackend,
    SendOptions, SwapRequest, TokenAccountResolver, TransactionAssembler, TransactionSubmitter,
};
pub use config::AppConfig;
pub use keys::{FileKeyProvider, KeyProvider};
