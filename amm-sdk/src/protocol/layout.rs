//! Fixed-offset account layouts.
//!
//! Every decoder checks the exact buffer length first and then reads fields
//! sequentially, so a decode either yields every field or fails as a whole.
//! Integers are little-endian.

use solana_sdk::pubkey::Pubkey;

use crate::core::{SdkError, SdkResult, MINT_LEN, TOKEN_ACCOUNT_LEN};

pub const AMM_STATE_V4_LEN: usize = 752;
pub const MARKET_STATE_V3_LEN: usize = 388;
pub const OPEN_ORDERS_LEN: usize = 3228;

// Market and open-orders accounts are framed by 5 leading and 7 trailing padding bytes
const MARKET_HEAD_PADDING: usize = 5;
const MARKET_TAIL_PADDING: usize = 7;
const OPEN_ORDERS_SLOTS: usize = 128;

fn check_len(layout: &'static str, address: &Pubkey, data: &[u8], expected: usize) -> SdkResult<()> {
    if data.len() != expected {
        return Err(SdkError::DecodeError {
            layout,
            address: *address,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Sequential reader over a buffer whose length has already been checked
struct LayoutReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> LayoutReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        out
    }

    fn skip(&mut self, len: usize) {
        self.offset += len;
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.bytes::<8>())
    }

    fn u128(&mut self) -> u128 {
        u128::from_le_bytes(self.bytes::<16>())
    }

    fn pubkey(&mut self) -> Pubkey {
        Pubkey::new_from_array(self.bytes::<32>())
    }
}

struct LayoutWriter {
    data: Vec<u8>,
}

impl LayoutWriter {
    fn with_capacity(len: usize) -> Self {
        Self {
            data: Vec::with_capacity(len),
        }
    }

    fn zeros(&mut self, len: usize) {
        self.data.resize(self.data.len() + len, 0);
    }

    fn u64(&mut self, value: u64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    fn u128(&mut self, value: u128) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    fn pubkey(&mut self, value: &Pubkey) {
        self.data.extend_from_slice(value.as_ref());
    }

    fn finish(self) -> Vec<u8> {
        self.data
    }
}

/// AMM v4 pool state (752 bytes)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AmmStateV4 {
    pub status: u64,
    pub nonce: u64,
    pub max_order: u64,
    pub depth: u64,
    pub base_decimal: u64,
    pub quote_decimal: u64,
    pub state: u64,
    pub reset_flag: u64,
    pub min_size: u64,
    pub vol_max_cut_ratio: u64,
    pub amount_wave_ratio: u64,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
    pub min_price_multiplier: u64,
    pub max_price_multiplier: u64,
    pub system_decimal_value: u64,
    pub fees: AmmFees,
    pub base_need_take_pnl: u64,
    pub quote_need_take_pnl: u64,
    pub quote_total_pnl: u64,
    pub base_total_pnl: u64,
    pub pool_open_time: u64,
    pub punish_pc_amount: u64,
    pub punish_coin_amount: u64,
    pub orderbook_to_init_time: u64,
    pub swap_base_in_amount: u128,
    pub swap_quote_out_amount: u128,
    pub swap_base_to_quote_fee: u64,
    pub swap_quote_in_amount: u128,
    pub swap_base_out_amount: u128,
    pub swap_quote_to_base_fee: u64,
    /// offset 336
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub open_orders: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub target_orders: Pubkey,
    pub withdraw_queue: Pubkey,
    pub lp_vault: Pubkey,
    pub owner: Pubkey,
    pub lp_reserve: u64,
    pub padding: [u64; 3],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmmFees {
    pub min_separate_numerator: u64,
    pub min_separate_denominator: u64,
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub pnl_numerator: u64,
    pub pnl_denominator: u64,
    pub swap_fee_numerator: u64,
    pub swap_fee_denominator: u64,
}

impl AmmStateV4 {
    pub const LAYOUT: &'static str = "amm state v4";

    pub fn decode(address: &Pubkey, data: &[u8]) -> SdkResult<Self> {
        check_len(Self::LAYOUT, address, data, AMM_STATE_V4_LEN)?;
        let mut r = LayoutReader::new(data);

        Ok(Self {
            status: r.u64(),
            nonce: r.u64(),
            max_order: r.u64(),
            depth: r.u64(),
            base_decimal: r.u64(),
            quote_decimal: r.u64(),
            state: r.u64(),
            reset_flag: r.u64(),
            min_size: r.u64(),
            vol_max_cut_ratio: r.u64(),
            amount_wave_ratio: r.u64(),
            base_lot_size: r.u64(),
            quote_lot_size: r.u64(),
            min_price_multiplier: r.u64(),
            max_price_multiplier: r.u64(),
            system_decimal_value: r.u64(),
            fees: AmmFees {
                min_separate_numerator: r.u64(),
                min_separate_denominator: r.u64(),
                trade_fee_numerator: r.u64(),
                trade_fee_denominator: r.u64(),
                pnl_numerator: r.u64(),
                pnl_denominator: r.u64(),
                swap_fee_numerator: r.u64(),
                swap_fee_denominator: r.u64(),
            },
            base_need_take_pnl: r.u64(),
            quote_need_take_pnl: r.u64(),
            quote_total_pnl: r.u64(),
            base_total_pnl: r.u64(),
            pool_open_time: r.u64(),
            punish_pc_amount: r.u64(),
            punish_coin_amount: r.u64(),
            orderbook_to_init_time: r.u64(),
            swap_base_in_amount: r.u128(),
            swap_quote_out_amount: r.u128(),
            swap_base_to_quote_fee: r.u64(),
            swap_quote_in_amount: r.u128(),
            swap_base_out_amount: r.u128(),
            swap_quote_to_base_fee: r.u64(),
            base_vault: r.pubkey(),
            quote_vault: r.pubkey(),
            base_mint: r.pubkey(),
            quote_mint: r.pubkey(),
            lp_mint: r.pubkey(),
            open_orders: r.pubkey(),
            market_id: r.pubkey(),
            market_program_id: r.pubkey(),
            target_orders: r.pubkey(),
            withdraw_queue: r.pubkey(),
            lp_vault: r.pubkey(),
            owner: r.pubkey(),
            lp_reserve: r.u64(),
            padding: [r.u64(), r.u64(), r.u64()],
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = LayoutWriter::with_capacity(AMM_STATE_V4_LEN);
        for value in [
            self.status,
            self.nonce,
            self.max_order,
            self.depth,
            self.base_decimal,
            self.quote_decimal,
            self.state,
            self.reset_flag,
            self.min_size,
            self.vol_max_cut_ratio,
            self.amount_wave_ratio,
            self.base_lot_size,
            self.quote_lot_size,
            self.min_price_multiplier,
            self.max_price_multiplier,
            self.system_decimal_value,
            self.fees.min_separate_numerator,
            self.fees.min_separate_denominator,
            self.fees.trade_fee_numerator,
            self.fees.trade_fee_denominator,
            self.fees.pnl_numerator,
            self.fees.pnl_denominator,
            self.fees.swap_fee_numerator,
            self.fees.swap_fee_denominator,
            self.base_need_take_pnl,
            self.quote_need_take_pnl,
            self.quote_total_pnl,
            self.base_total_pnl,
            self.pool_open_time,
            self.punish_pc_amount,
            self.punish_coin_amount,
            self.orderbook_to_init_time,
        ] {
            w.u64(value);
        }
        w.u128(self.swap_base_in_amount);
        w.u128(self.swap_quote_out_amount);
        w.u64(self.swap_base_to_quote_fee);
        w.u128(self.swap_quote_in_amount);
        w.u128(self.swap_base_out_amount);
        w.u64(self.swap_quote_to_base_fee);
        for key in [
            &self.base_vault,
            &self.quote_vault,
            &self.base_mint,
            &self.quote_mint,
            &self.lp_mint,
            &self.open_orders,
            &self.market_id,
            &self.market_program_id,
            &self.target_orders,
            &self.withdraw_queue,
            &self.lp_vault,
            &self.owner,
        ] {
            w.pubkey(key);
        }
        w.u64(self.lp_reserve);
        for value in self.padding {
            w.u64(value);
        }
        w.finish()
    }
}

/// Order-book market state v3 (388 bytes)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketStateV3 {
    pub account_flags: u64,
    pub own_address: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub base_deposits_total: u64,
    pub base_fees_accrued: u64,
    pub quote_vault: Pubkey,
    pub quote_deposits_total: u64,
    pub quote_fees_accrued: u64,
    pub quote_dust_threshold: u64,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
    pub fee_rate_bps: u64,
    pub referrer_rebates_accrued: u64,
}

impl MarketStateV3 {
    pub const LAYOUT: &'static str = "market state v3";

    pub fn decode(address: &Pubkey, data: &[u8]) -> SdkResult<Self> {
        check_len(Self::LAYOUT, address, data, MARKET_STATE_V3_LEN)?;
        let mut r = LayoutReader::new(data);
        r.skip(MARKET_HEAD_PADDING);

        Ok(Self {
            account_flags: r.u64(),
            own_address: r.pubkey(),
            vault_signer_nonce: r.u64(),
            base_mint: r.pubkey(),
            quote_mint: r.pubkey(),
            base_vault: r.pubkey(),
            base_deposits_total: r.u64(),
            base_fees_accrued: r.u64(),
            quote_vault: r.pubkey(),
            quote_deposits_total: r.u64(),
            quote_fees_accrued: r.u64(),
            quote_dust_threshold: r.u64(),
            request_queue: r.pubkey(),
            event_queue: r.pubkey(),
            bids: r.pubkey(),
            asks: r.pubkey(),
            base_lot_size: r.u64(),
            quote_lot_size: r.u64(),
            fee_rate_bps: r.u64(),
            referrer_rebates_accrued: r.u64(),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = LayoutWriter::with_capacity(MARKET_STATE_V3_LEN);
        w.zeros(MARKET_HEAD_PADDING);
        w.u64(self.account_flags);
        w.pubkey(&self.own_address);
        w.u64(self.vault_signer_nonce);
        w.pubkey(&self.base_mint);
        w.pubkey(&self.quote_mint);
        w.pubkey(&self.base_vault);
        w.u64(self.base_deposits_total);
        w.u64(self.base_fees_accrued);
        w.pubkey(&self.quote_vault);
        w.u64(self.quote_deposits_total);
        w.u64(self.quote_fees_accrued);
        w.u64(self.quote_dust_threshold);
        w.pubkey(&self.request_queue);
        w.pubkey(&self.event_queue);
        w.pubkey(&self.bids);
        w.pubkey(&self.asks);
        w.u64(self.base_lot_size);
        w.u64(self.quote_lot_size);
        w.u64(self.fee_rate_bps);
        w.u64(self.referrer_rebates_accrued);
        w.zeros(MARKET_TAIL_PADDING);
        w.finish()
    }
}

/// Open-orders header fields. The order slots are length-checked but not kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenOrdersState {
    pub account_flags: u64,
    pub market: Pubkey,
    pub owner: Pubkey,
    pub base_token_free: u64,
    pub base_token_total: u64,
    pub quote_token_free: u64,
    pub quote_token_total: u64,
    pub referrer_rebates_accrued: u64,
}

impl OpenOrdersState {
    pub const LAYOUT: &'static str = "open orders";

    // free-slot bits and is-bid bits (u128 each), then order ids (u128) and client ids (u64)
    const SLOTS_LEN: usize = 16 + 16 + OPEN_ORDERS_SLOTS * 16 + OPEN_ORDERS_SLOTS * 8;

    pub fn decode(address: &Pubkey, data: &[u8]) -> SdkResult<Self> {
        check_len(Self::LAYOUT, address, data, OPEN_ORDERS_LEN)?;
        let mut r = LayoutReader::new(data);
        r.skip(MARKET_HEAD_PADDING);

        let account_flags = r.u64();
        let market = r.pubkey();
        let owner = r.pubkey();
        let base_token_free = r.u64();
        let base_token_total = r.u64();
        let quote_token_free = r.u64();
        let quote_token_total = r.u64();
        r.skip(Self::SLOTS_LEN);
        let referrer_rebates_accrued = r.u64();

        Ok(Self {
            account_flags,
            market,
            owner,
            base_token_free,
            base_token_total,
            quote_token_free,
            quote_token_total,
            referrer_rebates_accrued,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = LayoutWriter::with_capacity(OPEN_ORDERS_LEN);
        w.zeros(MARKET_HEAD_PADDING);
        w.u64(self.account_flags);
        w.pubkey(&self.market);
        w.pubkey(&self.owner);
        w.u64(self.base_token_free);
        w.u64(self.base_token_total);
        w.u64(self.quote_token_free);
        w.u64(self.quote_token_total);
        w.zeros(Self::SLOTS_LEN);
        w.u64(self.referrer_rebates_accrued);
        w.zeros(MARKET_TAIL_PADDING);
        w.finish()
    }
}

/// Balance of an SPL token account
pub fn token_account_amount(address: &Pubkey, data: &[u8]) -> SdkResult<u64> {
    check_len("token account", address, data, TOKEN_ACCOUNT_LEN)?;
    let mut r = LayoutReader::new(data);
    // mint, owner
    r.skip(64);
    Ok(r.u64())
}

/// Supply and decimals of an SPL mint
pub fn mint_supply_and_decimals(address: &Pubkey, data: &[u8]) -> SdkResult<(u64, u8)> {
    check_len("mint", address, data, MINT_LEN)?;
    let mut r = LayoutReader::new(data);
    // mint authority option
    r.skip(36);
    let supply = r.u64();
    let [decimals] = r.bytes::<1>();
    Ok((supply, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_amm_state() -> AmmStateV4 {
        AmmStateV4 {
            status: 6,
            nonce: 254,
            base_decimal: 9,
            quote_decimal: 6,
            fees: AmmFees {
                trade_fee_numerator: 25,
                trade_fee_denominator: 10_000,
                ..AmmFees::default()
            },
            base_need_take_pnl: 11,
            quote_need_take_pnl: 22,
            swap_base_in_amount: u128::MAX - 7,
            swap_quote_to_base_fee: 99,
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            open_orders: Pubkey::new_unique(),
            market_id: Pubkey::new_unique(),
            market_program_id: Pubkey::new_unique(),
            target_orders: Pubkey::new_unique(),
            withdraw_queue: Pubkey::new_unique(),
            lp_vault: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            lp_reserve: 1_000,
            padding: [1, 2, 3],
            ..AmmStateV4::default()
        }
    }

    #[test]
    fn test_amm_state_encoded_length() {
        assert_eq!(sample_amm_state().encode().len(), AMM_STATE_V4_LEN);
        assert_eq!(MarketStateV3::default().encode().len(), MARKET_STATE_V3_LEN);
        assert_eq!(OpenOrdersState::default().encode().len(), OPEN_ORDERS_LEN);
    }

    #[test]
    fn test_amm_state_roundtrip() {
        let address = Pubkey::new_unique();
        let state = sample_amm_state();
        let decoded = AmmStateV4::decode(&address, &state.encode()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_amm_state_field_offsets() {
        let state = sample_amm_state();
        let data = state.encode();
        assert_eq!(&data[32..40], &9u64.to_le_bytes());
        assert_eq!(&data[336..368], state.base_vault.as_ref());
        assert_eq!(&data[400..432], state.base_mint.as_ref());
        assert_eq!(&data[496..528], state.open_orders.as_ref());
        assert_eq!(&data[528..560], state.market_id.as_ref());
        assert_eq!(&data[592..624], state.target_orders.as_ref());
        assert_eq!(&data[720..728], &1_000u64.to_le_bytes());
    }

    #[test]
    fn test_market_state_field_offsets() {
        let market = MarketStateV3 {
            own_address: Pubkey::new_unique(),
            vault_signer_nonce: 3,
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
            ..MarketStateV3::default()
        };
        let data = market.encode();
        assert_eq!(&data[13..45], market.own_address.as_ref());
        assert_eq!(&data[45..53], &3u64.to_le_bytes());
        assert_eq!(&data[117..149], market.base_vault.as_ref());
        assert_eq!(&data[165..197], market.quote_vault.as_ref());
        assert_eq!(&data[253..285], market.event_queue.as_ref());
        assert_eq!(&data[285..317], market.bids.as_ref());
        assert_eq!(&data[317..349], market.asks.as_ref());

        let decoded = MarketStateV3::decode(&Pubkey::new_unique(), &data).unwrap();
        assert_eq!(decoded, market);
    }

    #[test]
    fn test_wrong_length_fails() {
        let address = Pubkey::new_unique();
        let mut data = sample_amm_state().encode();
        data.push(0);
        match AmmStateV4::decode(&address, &data) {
            Err(SdkError::DecodeError {
                expected, actual, ..
            }) => {
                assert_eq!(expected, AMM_STATE_V4_LEN);
                assert_eq!(actual, AMM_STATE_V4_LEN + 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(MarketStateV3::decode(&address, &[0u8; 387]).is_err());
        assert!(OpenOrdersState::decode(&address, &[]).is_err());
        assert!(AmmStateV4::decode(&address, &[0u8; MARKET_STATE_V3_LEN]).is_err());
    }

    #[test]
    fn test_open_orders_totals() {
        let orders = OpenOrdersState {
            base_token_total: 500,
            quote_token_total: 700,
            referrer_rebates_accrued: 4,
            ..OpenOrdersState::default()
        };
        let data = orders.encode();
        assert_eq!(&data[85..93], &500u64.to_le_bytes());
        assert_eq!(&data[101..109], &700u64.to_le_bytes());
        let decoded = OpenOrdersState::decode(&Pubkey::new_unique(), &data).unwrap();
        assert_eq!(decoded, orders);
    }

    #[test]
    fn test_token_field_readers() {
        let address = Pubkey::new_unique();
        let mut account = vec![0u8; TOKEN_ACCOUNT_LEN];
        account[64..72].copy_from_slice(&123_456u64.to_le_bytes());
        assert_eq!(token_account_amount(&address, &account).unwrap(), 123_456);

        let mut mint = vec![0u8; MINT_LEN];
        mint[36..44].copy_from_slice(&9_000u64.to_le_bytes());
        mint[44] = 6;
        assert_eq!(mint_supply_and_decimals(&address, &mint).unwrap(), (9_000, 6));

        assert!(token_account_amount(&address, &mint).is_err());
    }
}
