use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use crate::{
    core::{discriminator, PoolKeys, SdkResult, SWAP_ACCOUNTS_LEN},
    impl_instruction_data,
    instructions::{AmmInstructionBuilder, InstructionData},
};

/// Arguments of a fixed-input swap
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SwapBaseInData {
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

impl_instruction_data!(SwapBaseInData, discriminator::SWAP_BASE_IN);

/// Accounts of a fixed-input swap, in program order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapAccounts {
    pub token_program: Pubkey,
    pub amm: Pubkey,
    pub amm_authority: Pubkey,
    pub amm_open_orders: Pubkey,
    pub pool_base_vault: Pubkey,
    pub pool_quote_vault: Pubkey,
    pub market_program: Pubkey,
    pub market: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub market_authority: Pubkey,
    pub user_source: Pubkey,
    pub user_destination: Pubkey,
    pub user_owner: Pubkey,
}

impl SwapAccounts {
    pub fn new(
        keys: &PoolKeys,
        user_source: Pubkey,
        user_destination: Pubkey,
        user_owner: Pubkey,
    ) -> Self {
        Self {
            token_program: spl_token::id(),
            amm: keys.id,
            amm_authority: keys.authority,
            amm_open_orders: keys.open_orders,
            pool_base_vault: keys.base_vault,
            pool_quote_vault: keys.quote_vault,
            market_program: keys.market_program_id,
            market: keys.market_id,
            market_bids: keys.market_bids,
            market_asks: keys.market_asks,
            market_event_queue: keys.market_event_queue,
            market_base_vault: keys.market_base_vault,
            market_quote_vault: keys.market_quote_vault,
            market_authority: keys.market_authority,
            user_source,
            user_destination,
            user_owner,
        }
    }

    fn builder(&self, program_id: Pubkey) -> AmmInstructionBuilder {
        AmmInstructionBuilder::new(program_id)
            .add_readonly(self.token_program)
            .add_writable(self.amm)
            .add_readonly(self.amm_authority)
            .add_writable(self.amm_open_orders)
            .add_writable(self.pool_base_vault)
            .add_writable(self.pool_quote_vault)
            .add_readonly(self.market_program)
            .add_writable(self.market)
            .add_writable(self.market_bids)
            .add_writable(self.market_asks)
            .add_writable(self.market_event_queue)
            .add_writable(self.market_base_vault)
            .add_writable(self.market_quote_vault)
            .add_readonly(self.market_authority)
            .add_writable(self.user_source)
            .add_writable(self.user_destination)
            .add_signer(self.user_owner)
    }
}

/// Swap exactly `amount_in` of the source token, failing on-chain below `minimum_amount_out`
pub fn swap_base_in(
    keys: &PoolKeys,
    accounts: &SwapAccounts,
    amount_in: u64,
    minimum_amount_out: u64,
) -> SdkResult<Instruction> {
    let data = SwapBaseInData {
        amount_in,
        minimum_amount_out,
    }
    .build_data()?;

    accounts
        .builder(keys.program_id)
        .with_data(data)
        .build(SWAP_ACCOUNTS_LEN)
}
