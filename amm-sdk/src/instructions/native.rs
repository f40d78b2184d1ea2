use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};

use crate::core::{SdkError, SdkResult};

/// Move lamports into a wrapped-native token account and make them visible as token balance
pub fn wrap_native(
    owner: &Pubkey,
    wrapped_account: &Pubkey,
    lamports: u64,
) -> SdkResult<[Instruction; 2]> {
    let transfer = system_instruction::transfer(owner, wrapped_account, lamports);
    Ok([transfer, sync_native(wrapped_account)?])
}

pub fn sync_native(wrapped_account: &Pubkey) -> SdkResult<Instruction> {
    spl_token::instruction::sync_native(&spl_token::id(), wrapped_account)
        .map_err(|e| SdkError::InvalidInstruction(format!("sync native: {}", e)))
}

/// Idempotent creation of `owner`'s associated account for `mint`, paid by `payer`
pub fn create_associated_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        payer,
        owner,
        mint,
        &spl_token::id(),
    )
}

pub fn associated_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}
