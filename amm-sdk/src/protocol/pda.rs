use solana_sdk::pubkey::Pubkey;

use crate::core::{SdkError, SdkResult};

pub mod seeds {
    pub const AMM_AUTHORITY: &[u8] = b"amm authority";
}

/// Derive an off-curve address from explicit seeds (no bump search)
pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> SdkResult<Pubkey> {
    Pubkey::create_program_address(seeds, program_id).map_err(|e| {
        SdkError::DerivationError(format!("seeds rejected under {}: {}", program_id, e))
    })
}

/// Market vault signer: seeds are the market address and its nonce as 8 LE bytes
pub fn market_authority(
    market_id: &Pubkey,
    vault_signer_nonce: u64,
    market_program_id: &Pubkey,
) -> SdkResult<Pubkey> {
    let nonce = vault_signer_nonce.to_le_bytes();
    derive_address(&[market_id.as_ref(), &nonce], market_program_id).map_err(|e| {
        SdkError::DerivationError(format!(
            "market {} nonce {}: {}",
            market_id, vault_signer_nonce, e
        ))
    })
}

/// First nonce producing a valid market authority, as chosen at market creation
pub fn find_market_authority(
    market_id: &Pubkey,
    market_program_id: &Pubkey,
) -> SdkResult<(Pubkey, u64)> {
    (0..=u8::MAX as u64)
        .find_map(|nonce| {
            market_authority(market_id, nonce, market_program_id)
                .ok()
                .map(|authority| (authority, nonce))
        })
        .ok_or_else(|| {
            SdkError::DerivationError(format!("no vault signer nonce for market {}", market_id))
        })
}

/// Pool authority shared by every pool of an AMM program
pub fn amm_authority(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::AMM_AUTHORITY], program_id)
}
