use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use crate::{
    core::{discriminator, PoolKeys, SdkError, SdkResult, ADD_LIQUIDITY_ACCOUNTS_LEN},
    impl_instruction_data,
    instructions::{AmmInstructionBuilder, InstructionData},
};

/// Arguments of a two-sided deposit.
///
/// `base_side` names the side whose amount is fixed: 0 for base, 1 for quote.
/// The other side's amount is a ceiling.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidityData {
    pub max_base_amount: u64,
    pub max_quote_amount: u64,
    pub base_side: u64,
}

impl_instruction_data!(AddLiquidityData, discriminator::ADD_LIQUIDITY);

impl AddLiquidityData {
    /// Place a deposit of `amount` (fixed side) and `max_another_amount` into pool order
    pub fn from_deposit(amount: u64, max_another_amount: u64, base_side: u64) -> SdkResult<Self> {
        match base_side {
            0 => Ok(Self {
                max_base_amount: amount,
                max_quote_amount: max_another_amount,
                base_side,
            }),
            1 => Ok(Self {
                max_base_amount: max_another_amount,
                max_quote_amount: amount,
                base_side,
            }),
            other => Err(SdkError::InvalidParameters(format!(
                "base side must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// Accounts of a deposit, in program order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidityAccounts {
    pub token_program: Pubkey,
    pub amm: Pubkey,
    pub amm_authority: Pubkey,
    pub amm_open_orders: Pubkey,
    pub amm_target_orders: Pubkey,
    pub lp_mint: Pubkey,
    pub pool_base_vault: Pubkey,
    pub pool_quote_vault: Pubkey,
    pub market: Pubkey,
    pub user_base_token: Pubkey,
    pub user_quote_token: Pubkey,
    pub user_lp_token: Pubkey,
    pub user_owner: Pubkey,
    pub market_event_queue: Pubkey,
}

impl AddLiquidityAccounts {
    pub fn new(
        keys: &PoolKeys,
        user_base_token: Pubkey,
        user_quote_token: Pubkey,
        user_lp_token: Pubkey,
        user_owner: Pubkey,
    ) -> Self {
        Self {
            token_program: spl_token::id(),
            amm: keys.id,
            amm_authority: keys.authority,
            amm_open_orders: keys.open_orders,
            amm_target_orders: keys.target_orders,
            lp_mint: keys.lp_mint,
            pool_base_vault: keys.base_vault,
            pool_quote_vault: keys.quote_vault,
            market: keys.market_id,
            user_base_token,
            user_quote_token,
            user_lp_token,
            user_owner,
            market_event_queue: keys.market_event_queue,
        }
    }

    fn builder(&self, program_id: Pubkey) -> AmmInstructionBuilder {
        AmmInstructionBuilder::new(program_id)
            .add_readonly(self.token_program)
            .add_writable(self.amm)
            .add_readonly(self.amm_authority)
            .add_readonly(self.amm_open_orders)
            .add_writable(self.amm_target_orders)
            .add_writable(self.lp_mint)
            .add_writable(self.pool_base_vault)
            .add_writable(self.pool_quote_vault)
            .add_readonly(self.market)
            .add_writable(self.user_base_token)
            .add_writable(self.user_quote_token)
            .add_writable(self.user_lp_token)
            .add_signer(self.user_owner)
            .add_readonly(self.market_event_queue)
    }
}

pub fn add_liquidity(
    keys: &PoolKeys,
    accounts: &AddLiquidityAccounts,
    data: &AddLiquidityData,
) -> SdkResult<Instruction> {
    accounts
        .builder(keys.program_id)
        .with_data(data.build_data()?)
        .build(ADD_LIQUIDITY_ACCOUNTS_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pool_keys;

    fn accounts(keys: &PoolKeys, owner: Pubkey) -> AddLiquidityAccounts {
        AddLiquidityAccounts::new(
            keys,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            owner,
        )
    }

    #[test]
    fn test_add_liquidity_shape() {
        let keys = sample_pool_keys();
        let owner = Pubkey::new_unique();
        let accounts = accounts(&keys, owner);
        let data = AddLiquidityData::from_deposit(1_000, 2_020, 0).unwrap();
        let ix = add_liquidity(&keys, &accounts, &data).unwrap();

        assert_eq!(ix.accounts.len(), 14);
        assert_eq!(ix.accounts[0].pubkey, spl_token::id());
        assert_eq!(ix.accounts[4].pubkey, keys.target_orders);
        assert_eq!(ix.accounts[9].pubkey, accounts.user_base_token);
        assert_eq!(ix.accounts[12].pubkey, owner);
        assert_eq!(ix.accounts[13].pubkey, keys.market_event_queue);

        let writable: Vec<usize> = ix
            .accounts
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_writable)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(writable, vec![1, 4, 5, 6, 7, 9, 10, 11]);

        let signers: Vec<usize> = ix
            .accounts
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_signer)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(signers, vec![12]);
    }

    #[test]
    fn test_add_liquidity_data() {
        let keys = sample_pool_keys();
        let accounts = accounts(&keys, Pubkey::new_unique());
        let data = AddLiquidityData::from_deposit(1_000, 2_020, 0).unwrap();
        let ix = add_liquidity(&keys, &accounts, &data).unwrap();

        assert_eq!(ix.data.len(), 25);
        assert_eq!(ix.data[0], 3);
        assert_eq!(&ix.data[1..9], &1_000u64.to_le_bytes());
        assert_eq!(&ix.data[9..17], &2_020u64.to_le_bytes());
        assert_eq!(&ix.data[17..25], &0u64.to_le_bytes());
    }

    #[test]
    fn test_quote_side_deposit_order() {
        let data = AddLiquidityData::from_deposit(1_000, 505, 1).unwrap();
        assert_eq!(data.max_base_amount, 505);
        assert_eq!(data.max_quote_amount, 1_000);
        assert!(AddLiquidityData::from_deposit(1, 1, 2).is_err());
    }
}
