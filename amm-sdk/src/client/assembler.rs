//! Builds the swap and deposit instructions of every signer into one transaction.

use std::sync::Arc;

use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::info;

use crate::{
    client::{
        fetch_pool_info, resolve_liquidity_accounts, resolve_swap_accounts, AccountReader,
        PoolKeySource, SendOptions, TokenAccountResolver, TransactionSubmitter,
    },
    core::{ExecuteKeyPair, PoolInfo, PoolKeys, SdkError, SdkResult, Slippage, TokenRoute},
    instructions::{
        add_liquidity, swap_base_in, wrap_native, AddLiquidityAccounts, AddLiquidityData,
        SwapAccounts,
    },
    protocol::{base_side, compute_amount_out, compute_another_amount, AmountOut, AnotherAmount},
};

/// Swap every buyer performs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub token_out: Pubkey,
    /// Human-entered input amount
    pub amount_in: String,
    pub slippage: Slippage,
}

/// Deposit made by the liquidity signer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiquidityRequest {
    pub token_a: Pubkey,
    /// Human-entered amount of `token_a`
    pub amount_a: String,
    pub slippage: Slippage,
}

/// Ordered instructions ready for signing, with the quotes they were built from
#[derive(Clone, Debug)]
pub struct BuiltTransaction {
    pub payer: Pubkey,
    pub instructions: Vec<Instruction>,
    pub swaps: Vec<(Pubkey, AmountOut)>,
    pub deposit: Option<(Pubkey, AnotherAmount)>,
}

pub struct TransactionAssembler {
    resolver: Arc<dyn TokenAccountResolver>,
    submitter: Arc<dyn TransactionSubmitter>,
    options: SendOptions,
}

impl TransactionAssembler {
    pub fn new(
        resolver: Arc<dyn TokenAccountResolver>,
        submitter: Arc<dyn TransactionSubmitter>,
    ) -> Self {
        Self {
            resolver,
            submitter,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    /// Wrap steps (when native is involved) followed by the swap, for one buyer
    pub async fn swap_instructions(
        &self,
        keys: &PoolKeys,
        info: &PoolInfo,
        request: &SwapRequest,
        buyer: &Keypair,
    ) -> SdkResult<(Vec<Instruction>, AmountOut)> {
        let quote = compute_amount_out(
            keys,
            info,
            &request.amount_in,
            &request.token_out,
            request.slippage,
        )?;
        if quote.amount_in.is_zero() {
            return Err(SdkError::InvalidAmount(request.amount_in.clone()));
        }

        let owner = buyer.pubkey();
        let accounts = resolve_swap_accounts(
            &*self.resolver,
            buyer,
            &quote.token_in(),
            &quote.token_out(),
        )
        .await?;

        let mut instructions = Vec::with_capacity(3);
        match accounts.route {
            TokenRoute::NativeIn => {
                instructions.extend(wrap_native(&owner, &accounts.source, quote.amount_in.raw)?)
            }
            TokenRoute::NativeOut => instructions.extend(wrap_native(
                &owner,
                &accounts.destination,
                quote.min_amount_out.raw,
            )?),
            TokenRoute::NeitherNative => {}
        }

        let swap_accounts = SwapAccounts::new(keys, accounts.source, accounts.destination, owner);
        instructions.push(swap_base_in(
            keys,
            &swap_accounts,
            quote.amount_in.raw,
            quote.min_amount_out.raw,
        )?);

        Ok((instructions, quote))
    }

    /// Wrap steps (when native is involved) followed by the deposit
    pub async fn liquidity_instructions(
        &self,
        keys: &PoolKeys,
        info: &PoolInfo,
        request: &LiquidityRequest,
        provider: &Keypair,
    ) -> SdkResult<(Vec<Instruction>, AnotherAmount)> {
        let side_a = keys.side_of(&request.token_a)?;
        let token_b = keys.mint(side_a.opposite());
        let deposit = compute_another_amount(
            keys,
            info,
            &request.token_a,
            &request.amount_a,
            &token_b,
            request.slippage,
        )?;
        if deposit.amount.is_zero() {
            return Err(SdkError::InvalidAmount(request.amount_a.clone()));
        }

        let owner = provider.pubkey();
        let accounts =
            resolve_liquidity_accounts(&*self.resolver, provider, keys, &request.token_a)
                .await?;

        let mut instructions = Vec::with_capacity(3);
        match accounts.route {
            TokenRoute::NativeIn => instructions.extend(wrap_native(
                &owner,
                &accounts.token_a(),
                deposit.amount.raw,
            )?),
            TokenRoute::NativeOut => instructions.extend(wrap_native(
                &owner,
                &accounts.token_b(),
                deposit.max_another_amount.raw,
            )?),
            TokenRoute::NeitherNative => {}
        }

        let data = AddLiquidityData::from_deposit(
            deposit.amount.raw,
            deposit.max_another_amount.raw,
            base_side(keys, &request.token_a)?,
        )?;
        let deposit_accounts =
            AddLiquidityAccounts::new(keys, accounts.base, accounts.quote, accounts.lp, owner);
        instructions.push(add_liquidity(keys, &deposit_accounts, &data)?);

        Ok((instructions, deposit))
    }

    /// Build every buyer's swap, then the optional deposit, against one pool snapshot
    pub async fn build(
        &self,
        keys: &PoolKeys,
        info: &PoolInfo,
        swap: &SwapRequest,
        liquidity: Option<&LiquidityRequest>,
        signers: &ExecuteKeyPair,
    ) -> SdkResult<BuiltTransaction> {
        let mut instructions = Vec::new();
        let mut swaps = Vec::with_capacity(signers.buyers().len());

        for buyer in signers.buyers() {
            info!(buyer = %buyer.pubkey(), pool = %keys.id, "Creating swap instruction");
            let (ixs, quote) = self.swap_instructions(keys, info, swap, buyer).await?;
            instructions.extend(ixs);
            swaps.push((buyer.pubkey(), quote));
            info!(
                buyer = %buyer.pubkey(),
                amount_in = %quote.amount_in,
                min_amount_out = %quote.min_amount_out,
                "Added swap instruction"
            );
        }

        let deposit = match liquidity {
            Some(request) => {
                let provider = signers.liquidity();
                info!(provider = %provider.pubkey(), pool = %keys.id, "Creating add liquidity instruction");
                let (ixs, deposit) = self
                    .liquidity_instructions(keys, info, request, provider)
                    .await?;
                instructions.extend(ixs);
                info!(
                    provider = %provider.pubkey(),
                    amount = %deposit.amount,
                    max_another_amount = %deposit.max_another_amount,
                    "Added add liquidity instruction"
                );
                Some((provider.pubkey(), deposit))
            }
            None => None,
        };

        let payer = signers
            .buyers()
            .first()
            .map(|k| k.pubkey())
            .ok_or_else(|| SdkError::InvalidParameters("no buyer to pay fees".to_string()))?;

        Ok(BuiltTransaction {
            payer,
            instructions,
            swaps,
            deposit,
        })
    }

    /// Sign with every distinct signer and submit as a single transaction
    pub async fn submit(
        &self,
        built: &BuiltTransaction,
        signers: &ExecuteKeyPair,
    ) -> SdkResult<Signature> {
        let mut tx = Transaction::new_with_payer(&built.instructions, Some(&built.payer));
        let blockhash = self.submitter.latest_blockhash().await?;

        let signing: Vec<&Keypair> = signers
            .distinct_signers()
            .into_iter()
            .filter(|k| tx.message.signer_keys().contains(&&k.pubkey()))
            .collect();
        tx.try_sign(signing.as_slice(), blockhash)
            .map_err(|e| SdkError::InvalidParameters(format!("signing failed: {}", e)))?;

        let signature = self.submitter.send(&tx, self.options).await?;
        info!(
            %signature,
            instructions = built.instructions.len(),
            signers = signing.len(),
            "Submitted transaction"
        );
        Ok(signature)
    }

    /// Resolve, snapshot, build and submit in one pass
    pub async fn execute(
        &self,
        source: &dyn PoolKeySource,
        reader: &dyn AccountReader,
        pool_id: &Pubkey,
        swap: &SwapRequest,
        liquidity: Option<&LiquidityRequest>,
        signers: &ExecuteKeyPair,
    ) -> SdkResult<Signature> {
        let keys = source.pool_keys(pool_id).await?;
        let info = fetch_pool_info(reader, &keys).await?;
        let built = self.build(&keys, &info, swap, liquidity, signers).await?;
        self.submit(&built, signers).await
    }
}
