use std::sync::Arc;

use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::{
    client::{AccountReader, SendOptions, TokenAccountResolver, TransactionSubmitter},
    core::{SdkError, SdkResult},
    instructions::{associated_account, create_associated_account, wrap_native},
};

/// RPC-backed implementation of every chain collaborator
#[derive(Clone)]
pub struct RpcBackend {
    rpc: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcBackend {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self::with_client(
            Arc::new(RpcClient::new_with_commitment(rpc_url.to_string(), commitment)),
            commitment,
        )
    }

    pub fn with_client(rpc: Arc<RpcClient>, commitment: CommitmentConfig) -> Self {
        Self { rpc, commitment }
    }

    async fn account_exists(&self, address: &Pubkey) -> SdkResult<bool> {
        Ok(self.fetch(address).await?.is_some())
    }

    /// Setup transactions are confirmed before returning so later reads observe them
    async fn send_setup(&self, instructions: &[Instruction], payer: &Keypair) -> SdkResult<Signature> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &[payer],
            recent_blockhash,
        );
        self.rpc
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|e| SdkError::SubmissionError(e.to_string()))
    }
}

#[async_trait]
impl AccountReader for RpcBackend {
    async fn fetch(&self, address: &Pubkey) -> SdkResult<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn fetch_multiple(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>> {
        let response = self
            .rpc
            .get_multiple_accounts_with_commitment(addresses, self.commitment)
            .await?;
        Ok(response
            .value
            .into_iter()
            .map(|account| account.map(|a| a.data))
            .collect())
    }
}

#[async_trait]
impl TokenAccountResolver for RpcBackend {
    async fn get_or_create(
        &self,
        payer: &Keypair,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> SdkResult<Pubkey> {
        let address = associated_account(owner, mint);
        if self.account_exists(&address).await? {
            debug!(%owner, %mint, %address, "Token account exists");
            return Ok(address);
        }

        let ix = create_associated_account(&payer.pubkey(), owner, mint);
        let signature = self.send_setup(&[ix], payer).await?;
        info!(%owner, %mint, %address, %signature, "Created token account");
        Ok(address)
    }

    async fn create_wrapped_native(
        &self,
        payer: &Keypair,
        owner: &Pubkey,
        initial_lamports: u64,
    ) -> SdkResult<Pubkey> {
        let native_mint = spl_token::native_mint::id();
        let address = associated_account(owner, &native_mint);

        let mut instructions = vec![create_associated_account(&payer.pubkey(), owner, &native_mint)];
        if initial_lamports > 0 {
            instructions.extend(wrap_native(&payer.pubkey(), &address, initial_lamports)?);
        }
        let signature = self.send_setup(&instructions, payer).await?;
        info!(%owner, %address, initial_lamports, %signature, "Prepared wrapped native account");
        Ok(address)
    }
}

#[async_trait]
impl TransactionSubmitter for RpcBackend {
    async fn latest_blockhash(&self) -> SdkResult<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send(&self, transaction: &Transaction, options: SendOptions) -> SdkResult<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(options.preflight_commitment),
            ..RpcSendTransactionConfig::default()
        };
        self.rpc
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| SdkError::SubmissionError(e.to_string()))
    }
}
