//! Swap and deposit assembly, signing and submission against an in-memory chain

use std::sync::Arc;

use amm_v4_sdk::{
    client::{
        LiquidityRequest, OnChainPoolKeys, SendOptions, SwapRequest, TransactionAssembler,
    },
    core::{ExecuteKeyPair, PoolKeys, SdkError, Slippage},
    instructions::associated_account,
    testing::{sample_pool_info, sample_pool_keys, InMemoryChain},
};
use solana_sdk::{
    commitment_config::CommitmentLevel,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_program,
};

fn native() -> Pubkey {
    spl_token::native_mint::id()
}

/// Base is an ordinary token, quote is wrapped native
fn native_quoted_pool() -> PoolKeys {
    let mut keys = sample_pool_keys();
    keys.quote_mint = native();
    keys
}

fn assembler(chain: &Arc<InMemoryChain>) -> TransactionAssembler {
    TransactionAssembler::new(chain.clone(), chain.clone())
}

fn swap_request(token_out: Pubkey, amount_in: &str) -> SwapRequest {
    SwapRequest {
        token_out,
        amount_in: amount_in.to_string(),
        slippage: Slippage::from_percent(1).unwrap(),
    }
}

fn transfer_lamports(ix: &Instruction) -> u64 {
    assert_eq!(ix.program_id, system_program::id());
    // u32 variant tag, then the lamports
    u64::from_le_bytes(ix.data[4..12].try_into().unwrap())
}

fn swap_data(amount_in: u64, min_out: u64) -> Vec<u8> {
    let mut data = vec![9u8];
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.extend_from_slice(&min_out.to_le_bytes());
    data
}

fn add_liquidity_data(max_base: u64, max_quote: u64, base_side: u64) -> Vec<u8> {
    let mut data = vec![3u8];
    data.extend_from_slice(&max_base.to_le_bytes());
    data.extend_from_slice(&max_quote.to_le_bytes());
    data.extend_from_slice(&base_side.to_le_bytes());
    data
}

#[tokio::test]
async fn test_swap_from_native_wraps_input() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = native_quoted_pool();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let buyer = Keypair::new();
    let wrapped = associated_account(&buyer.pubkey(), &native());

    let (ixs, quote) = assembler(&chain)
        .swap_instructions(&keys, &info, &swap_request(keys.base_mint, "0.001"), &buyer)
        .await
        .unwrap();

    assert_eq!(quote.amount_in.raw, 1000);
    assert_eq!(quote.amount_out.raw, 498);
    assert_eq!(quote.min_amount_out.raw, 493);

    assert_eq!(ixs.len(), 3);
    assert_eq!(transfer_lamports(&ixs[0]), 1000);
    assert_eq!(ixs[0].accounts[1].pubkey, wrapped);
    assert_eq!(ixs[1].program_id, spl_token::id());
    assert_eq!(ixs[1].accounts[0].pubkey, wrapped);

    let swap = &ixs[2];
    assert_eq!(swap.program_id, keys.program_id);
    assert_eq!(swap.accounts.len(), 17);
    assert_eq!(swap.accounts[14].pubkey, wrapped);
    assert_eq!(
        swap.accounts[15].pubkey,
        associated_account(&buyer.pubkey(), &keys.base_mint)
    );
    assert_eq!(swap.accounts[16].pubkey, buyer.pubkey());
    assert_eq!(swap.data, swap_data(1000, 493));
    assert!(chain.wrapped_accounts().is_empty());
}

#[tokio::test]
async fn test_swap_to_native_wraps_destination() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = native_quoted_pool();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let buyer = Keypair::new();
    let wrapped = associated_account(&buyer.pubkey(), &native());

    let (ixs, quote) = assembler(&chain)
        .swap_instructions(&keys, &info, &swap_request(native(), "0.001"), &buyer)
        .await
        .unwrap();

    // fee 2, out = 2_000_000 * 998 / 1_000_998
    assert_eq!(quote.amount_out.raw, 1994);
    assert_eq!(quote.min_amount_out.raw, 1974);

    assert_eq!(chain.wrapped_accounts(), vec![(buyer.pubkey(), 0)]);
    assert_eq!(ixs.len(), 3);
    assert_eq!(transfer_lamports(&ixs[0]), 1974);
    assert_eq!(ixs[0].accounts[1].pubkey, wrapped);
    assert_eq!(ixs[1].accounts[0].pubkey, wrapped);

    let swap = &ixs[2];
    assert_eq!(
        swap.accounts[14].pubkey,
        associated_account(&buyer.pubkey(), &keys.base_mint)
    );
    assert_eq!(swap.accounts[15].pubkey, wrapped);
    assert_eq!(swap.data, swap_data(1000, 1974));
}

#[tokio::test]
async fn test_swap_without_native_is_single_instruction() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = sample_pool_keys();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let buyer = Keypair::new();

    let (ixs, _) = assembler(&chain)
        .swap_instructions(&keys, &info, &swap_request(keys.quote_mint, "0.001"), &buyer)
        .await
        .unwrap();

    assert_eq!(ixs.len(), 1);
    assert_eq!(
        chain.created_accounts(),
        vec![
            (buyer.pubkey(), keys.base_mint),
            (buyer.pubkey(), keys.quote_mint)
        ]
    );
}

#[tokio::test]
async fn test_zero_swap_amount_rejected() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = sample_pool_keys();
    let info = sample_pool_info(1_000_000, 2_000_000);

    let result = assembler(&chain)
        .swap_instructions(&keys, &info, &swap_request(keys.base_mint, "0"), &Keypair::new())
        .await;
    assert!(matches!(result, Err(SdkError::InvalidAmount(_))));
    assert!(chain.created_accounts().is_empty());
}

#[tokio::test]
async fn test_native_quote_deposit() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = native_quoted_pool();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let provider = Keypair::new();
    let request = LiquidityRequest {
        token_a: native(),
        amount_a: "0.001".to_string(),
        slippage: Slippage::from_percent(1).unwrap(),
    };

    let (ixs, deposit) = assembler(&chain)
        .liquidity_instructions(&keys, &info, &request, &provider)
        .await
        .unwrap();

    // ceil(1000 * 1_000_000 / 2_000_000) = 500, ceil(500 * 1.01) = 505
    assert_eq!(deposit.amount.raw, 1000);
    assert_eq!(deposit.another_amount.raw, 500);
    assert_eq!(deposit.max_another_amount.raw, 505);

    let wrapped = associated_account(&provider.pubkey(), &native());
    assert_eq!(ixs.len(), 3);
    assert_eq!(transfer_lamports(&ixs[0]), 1000);
    assert_eq!(ixs[0].accounts[1].pubkey, wrapped);

    let add = &ixs[2];
    assert_eq!(add.accounts.len(), 14);
    assert_eq!(
        add.accounts[9].pubkey,
        associated_account(&provider.pubkey(), &keys.base_mint)
    );
    assert_eq!(add.accounts[10].pubkey, wrapped);
    assert_eq!(
        add.accounts[11].pubkey,
        associated_account(&provider.pubkey(), &keys.lp_mint)
    );

    assert_eq!(add.data, add_liquidity_data(505, 1000, 1));
}

#[tokio::test]
async fn test_deposit_without_native_is_single_instruction() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = sample_pool_keys();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let provider = Keypair::new();
    let owner = provider.pubkey();
    let request = LiquidityRequest {
        token_a: keys.base_mint,
        amount_a: "0.001".to_string(),
        slippage: Slippage::from_percent(1).unwrap(),
    };

    let (ixs, deposit) = assembler(&chain)
        .liquidity_instructions(&keys, &info, &request, &provider)
        .await
        .unwrap();

    assert_eq!(deposit.another_amount.raw, 2000);
    assert_eq!(deposit.max_another_amount.raw, 2020);
    assert_eq!(ixs.len(), 1);
    assert!(chain.wrapped_accounts().is_empty());
    assert_eq!(
        chain.created_accounts(),
        vec![
            (owner, keys.lp_mint),
            (owner, keys.base_mint),
            (owner, keys.quote_mint)
        ]
    );

    let add = &ixs[0];
    assert_eq!(add.program_id, keys.program_id);
    assert_eq!(add.accounts[9].pubkey, associated_account(&owner, &keys.base_mint));
    assert_eq!(add.accounts[10].pubkey, associated_account(&owner, &keys.quote_mint));
    assert_eq!(add.accounts[11].pubkey, associated_account(&owner, &keys.lp_mint));
    assert_eq!(add.accounts[12].pubkey, owner);
    assert_eq!(add.data, add_liquidity_data(1000, 2020, 0));
}

#[tokio::test]
async fn test_quote_side_deposit_keeps_pool_order() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = sample_pool_keys();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let provider = Keypair::new();
    let owner = provider.pubkey();
    let request = LiquidityRequest {
        token_a: keys.quote_mint,
        amount_a: "0.001".to_string(),
        slippage: Slippage::from_percent(1).unwrap(),
    };

    let (ixs, deposit) = assembler(&chain)
        .liquidity_instructions(&keys, &info, &request, &provider)
        .await
        .unwrap();

    assert_eq!(deposit.amount.raw, 1000);
    assert_eq!(deposit.max_another_amount.raw, 505);
    assert_eq!(ixs.len(), 1);

    // base slot carries the paired maximum, quote slot the fixed amount
    let add = &ixs[0];
    assert_eq!(add.accounts[9].pubkey, associated_account(&owner, &keys.base_mint));
    assert_eq!(add.accounts[10].pubkey, associated_account(&owner, &keys.quote_mint));
    assert_eq!(add.data, add_liquidity_data(505, 1000, 1));
}

#[tokio::test]
async fn test_build_and_submit_one_transaction() {
    let chain = Arc::new(InMemoryChain::new());
    let keys = native_quoted_pool();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let signers =
        ExecuteKeyPair::new(vec![Keypair::new(), Keypair::new()], Keypair::new()).unwrap();
    let liquidity = LiquidityRequest {
        token_a: keys.base_mint,
        amount_a: "0.002".to_string(),
        slippage: Slippage::from_percent(1).unwrap(),
    };
    let assembler = assembler(&chain);

    let built = assembler
        .build(
            &keys,
            &info,
            &swap_request(keys.base_mint, "0.001"),
            Some(&liquidity),
            &signers,
        )
        .await
        .unwrap();

    assert_eq!(built.payer, signers.buyers()[0].pubkey());
    assert_eq!(built.swaps.len(), 2);
    // two wrapped swaps, then a deposit wrapping the native quote side
    assert_eq!(built.instructions.len(), 3 + 3 + 3);
    let (provider, deposit) = built.deposit.unwrap();
    assert_eq!(provider, signers.liquidity().pubkey());
    assert_eq!(deposit.another_amount.raw, 4000);
    assert_eq!(transfer_lamports(&built.instructions[6]), 4040);

    let signature = assembler.submit(&built, &signers).await.unwrap();

    let sent = chain.sent_transactions();
    assert_eq!(sent.len(), 1);
    let (tx, options) = &sent[0];
    assert_eq!(tx.signatures[0], signature);
    assert_eq!(tx.signatures.len(), 3);
    assert_eq!(tx.message.account_keys[0], signers.buyers()[0].pubkey());
    assert_eq!(*options, SendOptions::default());
    assert!(!options.skip_preflight);
    assert_eq!(options.preflight_commitment, CommitmentLevel::Confirmed);
}

#[tokio::test]
async fn test_rejected_submission() {
    let chain = Arc::new(InMemoryChain::new());
    chain.reject_sends("blockhash not found");
    let keys = sample_pool_keys();
    let info = sample_pool_info(1_000_000, 2_000_000);
    let signers = ExecuteKeyPair::new(vec![Keypair::new()], Keypair::new()).unwrap();
    let assembler = assembler(&chain);

    let built = assembler
        .build(&keys, &info, &swap_request(keys.base_mint, "1"), None, &signers)
        .await
        .unwrap();
    assert!(built.deposit.is_none());

    let result = assembler.submit(&built, &signers).await;
    assert!(matches!(result, Err(SdkError::SubmissionError(reason)) if reason == "blockhash not found"));
    assert!(chain.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_execute_stops_on_missing_pool() {
    let chain = Arc::new(InMemoryChain::new());
    let pool_id = Pubkey::new_unique();
    let signers = ExecuteKeyPair::new(vec![Keypair::new()], Keypair::new()).unwrap();
    let source = OnChainPoolKeys::new(chain.clone());

    let result = assembler(&chain)
        .with_options(SendOptions {
            skip_preflight: true,
            preflight_commitment: CommitmentLevel::Processed,
        })
        .execute(
            &source,
            &*chain,
            &pool_id,
            &swap_request(native(), "1"),
            None,
            &signers,
        )
        .await;

    assert!(matches!(result, Err(SdkError::PoolNotFound(id)) if id == pool_id));
    assert!(chain.sent_transactions().is_empty());
}
