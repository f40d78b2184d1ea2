//! Common imports for callers driving the SDK end to end

pub use crate::{
    client::{
        fetch_pool_info, AccountReader, BuiltTransaction, CatalogStore, LiquidityRequest,
        OnChainPoolKeys, PoolKeySource, RpcBackend, SendOptions, SwapRequest,
        TokenAccountResolver, TransactionAssembler, TransactionSubmitter,
    },
    core::*,
    protocol::{compute_amount_out, compute_another_amount, AmountOut, AnotherAmount},
};

pub use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
