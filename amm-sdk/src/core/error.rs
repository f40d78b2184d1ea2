//! SDK error types

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Pool state account does not exist
    #[error("Pool not found: {0}")]
    PoolNotFound(Pubkey),

    /// Market account referenced by a pool does not exist
    #[error("Market {market} referenced by pool {pool} not found")]
    MarketNotFound { pool: Pubkey, market: Pubkey },

    /// Account bytes do not match the expected layout size
    #[error("Failed to decode {layout} at {address}: expected {expected} bytes, got {actual}")]
    DecodeError {
        layout: &'static str,
        address: Pubkey,
        expected: usize,
        actual: usize,
    },

    /// No valid program-derived address exists for the seeds
    #[error("Address derivation failed: {0}")]
    DerivationError(String),

    /// Pool reserves cannot support the computation
    #[error("Illegal pool state: {0}")]
    IllegalPoolState(String),

    /// Network or on-chain rejection of a submitted transaction
    #[error("Submission failed: {0}")]
    SubmissionError(String),

    /// Account required to build a transaction is missing
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid slippage {numerator}/{denominator}: must satisfy 0 <= numerator < denominator")]
    InvalidSlippage { numerator: u64, denominator: u64 },

    #[error("Invalid token amount '{0}'")]
    InvalidAmount(String),

    /// Account list violates the instruction's fixed shape
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("Math overflow")]
    MathOverflow,

    /// RPC error
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pool catalog download or lookup failure
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Failed to load key '{name}': {reason}")]
    KeyLoad { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<solana_client::client_error::ClientError> for SdkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        SdkError::Rpc(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::Catalog(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
