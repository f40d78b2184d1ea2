use std::fmt;

use serde::{Deserialize, Serialize};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::core::{SdkError, SdkResult};

/// Every address and numeric parameter identifying one pool and its paired market.
///
/// Serialized with the catalog's field names, so a catalog entry and a cached
/// resolution share one JSON shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKeys {
    #[serde(with = "pubkey_serde")]
    pub id: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub base_mint: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub quote_mint: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub lp_mint: Pubkey,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub lp_decimals: u8,
    pub version: u8,
    #[serde(with = "pubkey_serde")]
    pub program_id: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub authority: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub base_vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub quote_vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub lp_vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub open_orders: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub target_orders: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub withdraw_queue: Pubkey,
    pub market_version: u8,
    #[serde(with = "pubkey_serde")]
    pub market_program_id: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_id: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_authority: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_base_vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_quote_vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_bids: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_asks: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub market_event_queue: Pubkey,
    #[serde(default, with = "pubkey_serde")]
    pub lookup_table_account: Pubkey,
}

impl PoolKeys {
    /// Which side of the pool a mint sits on
    pub fn side_of(&self, mint: &Pubkey) -> SdkResult<PoolSide> {
        if *mint == self.base_mint {
            Ok(PoolSide::Base)
        } else if *mint == self.quote_mint {
            Ok(PoolSide::Quote)
        } else {
            Err(SdkError::InvalidParameters(format!(
                "mint {} is not traded by pool {}",
                mint, self.id
            )))
        }
    }

    pub fn mint(&self, side: PoolSide) -> Pubkey {
        match side {
            PoolSide::Base => self.base_mint,
            PoolSide::Quote => self.quote_mint,
        }
    }
}

/// One of the two assets held by a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolSide {
    Base,
    Quote,
}

impl PoolSide {
    pub fn opposite(self) -> Self {
        match self {
            PoolSide::Base => PoolSide::Quote,
            PoolSide::Quote => PoolSide::Base,
        }
    }
}

/// Reserve and decimal snapshot, fetched fresh for each build attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolInfo {
    pub status: u64,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub lp_decimals: u8,
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub lp_supply: u64,
}

impl PoolInfo {
    pub fn decimals(&self, side: PoolSide) -> u8 {
        match side {
            PoolSide::Base => self.base_decimals,
            PoolSide::Quote => self.quote_decimals,
        }
    }

    pub fn reserve(&self, side: PoolSide) -> u64 {
        match side {
            PoolSide::Base => self.base_reserve,
            PoolSide::Quote => self.quote_reserve,
        }
    }
}

/// A token quantity in the token's smallest unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAmount {
    pub mint: Pubkey,
    pub decimals: u8,
    pub raw: u64,
}

impl TokenAmount {
    pub fn new(mint: Pubkey, decimals: u8, raw: u64) -> Self {
        Self { mint, decimals, raw }
    }

    /// Parse a human-entered decimal string ("0.04") into raw units.
    ///
    /// Fractional digits beyond `decimals` are truncated.
    pub fn from_ui_amount(mint: Pubkey, decimals: u8, ui: &str) -> SdkResult<Self> {
        let text = ui.trim();
        let invalid = || SdkError::InvalidAmount(ui.to_string());

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let scale = 10u128
            .checked_pow(decimals as u32)
            .ok_or(SdkError::MathOverflow)?;
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let kept: String = fraction.chars().take(decimals as usize).collect();
        let padded = format!("{:0<width$}", kept, width = decimals as usize);
        let fraction: u128 = if padded.is_empty() {
            0
        } else {
            padded.parse().map_err(|_| invalid())?
        };

        let raw = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(SdkError::MathOverflow)?;
        let raw = u64::try_from(raw).map_err(|_| SdkError::MathOverflow)?;

        Ok(Self::new(mint, decimals, raw))
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Render raw units back as a decimal string
    pub fn to_ui_string(&self) -> String {
        if self.decimals == 0 {
            return self.raw.to_string();
        }
        let digits = format!("{:0>width$}", self.raw, width = self.decimals as usize + 1);
        let (whole, fraction) = digits.split_at(digits.len() - self.decimals as usize);
        format!("{}.{}", whole, fraction)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_ui_string(), self.mint)
    }
}

/// Rational slippage tolerance `numerator / denominator`, restricted to [0, 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slippage {
    numerator: u64,
    denominator: u64,
}

impl Slippage {
    pub fn new(numerator: u64, denominator: u64) -> SdkResult<Self> {
        if denominator == 0 || numerator >= denominator {
            return Err(SdkError::InvalidSlippage {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// `percent / 100`
    pub fn from_percent(percent: u64) -> SdkResult<Self> {
        Self::new(percent, 100)
    }

    pub fn from_bps(bps: u64) -> SdkResult<Self> {
        Self::new(bps, 10_000)
    }

    pub fn zero() -> Self {
        Self {
            numerator: 0,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `floor(amount * (1 - slippage))`
    pub fn lower_bound(&self, amount: u64) -> u64 {
        let kept = (self.denominator - self.numerator) as u128;
        // kept < denominator, so the result never exceeds `amount`
        ((amount as u128 * kept) / self.denominator as u128) as u64
    }

    /// `ceil(amount * (1 + slippage))`
    pub fn upper_bound(&self, amount: u64) -> SdkResult<u64> {
        let grown = self.denominator as u128 + self.numerator as u128;
        let denominator = self.denominator as u128;
        let value = (amount as u128 * grown + denominator - 1) / denominator;
        u64::try_from(value).map_err(|_| SdkError::MathOverflow)
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// How a two-token operation touches the native currency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenRoute {
    /// Input token is wrapped native
    NativeIn,
    /// Output token is wrapped native
    NativeOut,
    NeitherNative,
}

impl TokenRoute {
    pub fn of(token_in: &Pubkey, token_out: &Pubkey) -> Self {
        let native = spl_token::native_mint::id();
        if *token_in == native {
            TokenRoute::NativeIn
        } else if *token_out == native {
            TokenRoute::NativeOut
        } else {
            TokenRoute::NeitherNative
        }
    }
}

/// Signers for one run: one or more buyers and a single liquidity provider
pub struct ExecuteKeyPair {
    buy: Vec<Keypair>,
    liquidity: Keypair,
}

impl ExecuteKeyPair {
    pub fn new(buy: Vec<Keypair>, liquidity: Keypair) -> SdkResult<Self> {
        if buy.is_empty() {
            return Err(SdkError::InvalidParameters(
                "at least one buyer keypair is required".to_string(),
            ));
        }
        Ok(Self { buy, liquidity })
    }

    pub fn buyers(&self) -> &[Keypair] {
        &self.buy
    }

    pub fn liquidity(&self) -> &Keypair {
        &self.liquidity
    }

    /// Every signer once, buyers first
    pub fn distinct_signers(&self) -> Vec<&Keypair> {
        let mut signers: Vec<&Keypair> = Vec::with_capacity(self.buy.len() + 1);
        for keypair in self.buy.iter().chain(std::iter::once(&self.liquidity)) {
            if !signers.iter().any(|s| s.pubkey() == keypair.pubkey()) {
                signers.push(keypair);
            }
        }
        signers
    }
}

impl fmt::Debug for ExecuteKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteKeyPair")
            .field(
                "buy",
                &self.buy.iter().map(|k| k.pubkey()).collect::<Vec<_>>(),
            )
            .field("liquidity", &self.liquidity.pubkey())
            .finish()
    }
}

pub(crate) mod pubkey_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }

    /// Optional pubkey; an absent or empty string means `None`
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use solana_sdk::pubkey::Pubkey;
        use std::str::FromStr;

        pub fn serialize<S>(pubkey: &Option<Pubkey>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match pubkey {
                Some(pubkey) => serializer.serialize_str(&pubkey.to_string()),
                None => serializer.serialize_str(""),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Pubkey>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            if s.is_empty() {
                return Ok(None);
            }
            Pubkey::from_str(&s).map(Some).map_err(serde::de::Error::custom)
        }
    }
}
