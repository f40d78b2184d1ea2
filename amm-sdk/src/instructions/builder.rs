use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::core::{SdkError, SdkResult};

/// Instruction payload: one discriminator byte followed by the borsh-encoded arguments
pub trait InstructionData: BorshSerialize {
    const DISCRIMINATOR: u8;

    fn build_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = vec![Self::DISCRIMINATOR];
        data.extend_from_slice(
            &self
                .try_to_vec()
                .map_err(|e| SdkError::Serialization(e.to_string()))?,
        );
        Ok(data)
    }
}

/// Accumulates the ordered account list of one instruction
pub struct AmmInstructionBuilder {
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl AmmInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add a read-only signer account
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, true));
        self
    }

    /// Add a writable non-signer account
    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, false));
        self
    }

    /// Add a readonly account
    pub fn add_readonly(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Build the instruction, checking the account count and that exactly one
    /// entry signs.
    pub fn build(self, expected_accounts: usize) -> SdkResult<Instruction> {
        if self.accounts.len() != expected_accounts {
            return Err(SdkError::InvalidInstruction(format!(
                "expected {} accounts, got {}",
                expected_accounts,
                self.accounts.len()
            )));
        }
        let signers = self.accounts.iter().filter(|meta| meta.is_signer).count();
        if signers != 1 {
            return Err(SdkError::InvalidInstruction(format!(
                "expected a single signer, got {}",
                signers
            )));
        }
        if self.data.is_empty() {
            return Err(SdkError::InvalidInstruction(
                "instruction data is empty".to_string(),
            ));
        }

        Ok(Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        })
    }
}

/// Macro for implementing InstructionData for an argument struct
#[macro_export]
macro_rules! impl_instruction_data {
    ($name:ident, $discriminator:expr) => {
        impl $crate::instructions::InstructionData for $name {
            const DISCRIMINATOR: u8 = $discriminator;
        }
    };
}
