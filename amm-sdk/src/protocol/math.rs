//! Swap and deposit amount computation over raw reserves.
//!
//! All arithmetic is integer math on smallest-unit amounts; decimals only
//! matter when a human-entered amount is parsed.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::core::{
    PoolInfo, PoolKeys, PoolSide, SdkError, SdkResult, Slippage, TokenAmount,
    TRADE_FEE_DENOMINATOR, TRADE_FEE_NUMERATOR,
};

/// Pricing rule mapping an input amount to a nominal output amount
pub trait PricingCurve: Send + Sync {
    fn amount_out(&self, amount_in: u64, reserve_in: u64, reserve_out: u64) -> SdkResult<u64>;
}

/// `x * y = k` with the trade fee taken from the input side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantProduct {
    pub fee_numerator: u64,
    pub fee_denominator: u64,
}

impl Default for ConstantProduct {
    fn default() -> Self {
        Self {
            fee_numerator: TRADE_FEE_NUMERATOR,
            fee_denominator: TRADE_FEE_DENOMINATOR,
        }
    }
}

impl PricingCurve for ConstantProduct {
    fn amount_out(&self, amount_in: u64, reserve_in: u64, reserve_out: u64) -> SdkResult<u64> {
        if self.fee_denominator == 0 {
            return Err(SdkError::InvalidParameters(
                "fee denominator cannot be zero".to_string(),
            ));
        }
        let fee = calculate_fee_amount(amount_in, self.fee_numerator, self.fee_denominator)?;
        let net_in = (amount_in - fee) as u128;

        let denominator = (reserve_in as u128)
            .checked_add(net_in)
            .ok_or(SdkError::MathOverflow)?;
        if denominator == 0 {
            return Ok(0);
        }

        // Bounded by reserve_out, so it always fits back into u64
        let out = (reserve_out as u128 * net_in) / denominator;
        u64::try_from(out).map_err(|_| SdkError::MathOverflow)
    }
}

/// `floor(amount * numerator / denominator)`, never larger than `amount` when numerator <= denominator
pub fn calculate_fee_amount(amount: u64, numerator: u64, denominator: u64) -> SdkResult<u64> {
    if numerator > denominator || denominator == 0 {
        return Err(SdkError::InvalidParameters(format!(
            "fee {}/{} out of range",
            numerator, denominator
        )));
    }
    Ok(((amount as u128 * numerator as u128) / denominator as u128) as u64)
}

/// Result of a swap quote
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountOut {
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    /// `floor(amount_out * (1 - slippage))`
    pub min_amount_out: TokenAmount,
}

impl AmountOut {
    pub fn token_in(&self) -> Pubkey {
        self.amount_in.mint
    }

    pub fn token_out(&self) -> Pubkey {
        self.amount_out.mint
    }
}

/// Result of a balanced deposit quote
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnotherAmount {
    pub amount: TokenAmount,
    pub another_amount: TokenAmount,
    /// `ceil(another_amount * (1 + slippage))`
    pub max_another_amount: TokenAmount,
}

fn ensure_reserves(keys: &PoolKeys, info: &PoolInfo) -> SdkResult<()> {
    if info.base_reserve == 0 || info.quote_reserve == 0 {
        return Err(SdkError::IllegalPoolState(format!(
            "pool {} has an empty reserve (base {}, quote {})",
            keys.id, info.base_reserve, info.quote_reserve
        )));
    }
    Ok(())
}

/// Quote a swap from a human-entered input amount.
///
/// The input side is the pool side opposite to `token_out`.
pub fn compute_amount_out(
    keys: &PoolKeys,
    info: &PoolInfo,
    amount_in: &str,
    token_out: &Pubkey,
    slippage: Slippage,
) -> SdkResult<AmountOut> {
    let in_side = keys.side_of(token_out)?.opposite();
    let amount_in =
        TokenAmount::from_ui_amount(keys.mint(in_side), info.decimals(in_side), amount_in)?;
    compute_amount_out_raw(&ConstantProduct::default(), keys, info, amount_in.raw, token_out, slippage)
}

/// Quote a swap from a raw input amount using an explicit pricing curve
pub fn compute_amount_out_raw(
    curve: &dyn PricingCurve,
    keys: &PoolKeys,
    info: &PoolInfo,
    amount_in: u64,
    token_out: &Pubkey,
    slippage: Slippage,
) -> SdkResult<AmountOut> {
    let out_side = keys.side_of(token_out)?;
    let in_side = out_side.opposite();
    ensure_reserves(keys, info)?;

    let amount_out = if amount_in == 0 {
        0
    } else {
        curve.amount_out(amount_in, info.reserve(in_side), info.reserve(out_side))?
    };
    let min_amount_out = slippage.lower_bound(amount_out);

    debug!(
        pool = %keys.id,
        amount_in,
        amount_out,
        min_amount_out,
        %slippage,
        "Computed swap amount out"
    );

    let in_token = |raw| TokenAmount::new(keys.mint(in_side), info.decimals(in_side), raw);
    let out_token = |raw| TokenAmount::new(keys.mint(out_side), info.decimals(out_side), raw);
    Ok(AmountOut {
        amount_in: in_token(amount_in),
        amount_out: out_token(amount_out),
        min_amount_out: out_token(min_amount_out),
    })
}

/// Quote the paired amount for a deposit of `amount_a` (human-entered) of `token_a`
pub fn compute_another_amount(
    keys: &PoolKeys,
    info: &PoolInfo,
    token_a: &Pubkey,
    amount_a: &str,
    token_b: &Pubkey,
    slippage: Slippage,
) -> SdkResult<AnotherAmount> {
    let side_a = keys.side_of(token_a)?;
    let amount_a = TokenAmount::from_ui_amount(*token_a, info.decimals(side_a), amount_a)?;
    compute_another_amount_raw(keys, info, amount_a.raw, token_a, token_b, slippage)
}

pub fn compute_another_amount_raw(
    keys: &PoolKeys,
    info: &PoolInfo,
    amount_a: u64,
    token_a: &Pubkey,
    token_b: &Pubkey,
    slippage: Slippage,
) -> SdkResult<AnotherAmount> {
    let side_a = keys.side_of(token_a)?;
    let side_b = keys.side_of(token_b)?;
    if side_a == side_b {
        return Err(SdkError::InvalidParameters(format!(
            "deposit needs both sides of pool {}, got {} twice",
            keys.id, token_a
        )));
    }
    ensure_reserves(keys, info)?;

    let reserve_a = info.reserve(side_a) as u128;
    let reserve_b = info.reserve(side_b) as u128;
    // ceil(amount_a * reserve_b / reserve_a)
    let nominal = (amount_a as u128 * reserve_b + reserve_a - 1) / reserve_a;
    let another_amount = u64::try_from(nominal).map_err(|_| SdkError::MathOverflow)?;
    let max_another_amount = slippage.upper_bound(another_amount)?;

    debug!(
        pool = %keys.id,
        amount_a,
        another_amount,
        max_another_amount,
        %slippage,
        "Computed deposit amount"
    );

    let b_token = |raw| TokenAmount::new(*token_b, info.decimals(side_b), raw);
    Ok(AnotherAmount {
        amount: TokenAmount::new(*token_a, info.decimals(side_a), amount_a),
        another_amount: b_token(another_amount),
        max_another_amount: b_token(max_another_amount),
    })
}

/// Deposit side flag: 0 when the given token is the pool's base asset, otherwise 1
pub fn base_side(keys: &PoolKeys, token_a: &Pubkey) -> SdkResult<u64> {
    Ok(match keys.side_of(token_a)? {
        PoolSide::Base => 0,
        PoolSide::Quote => 1,
    })
}
