use solana_sdk::{pubkey, pubkey::Pubkey};

/// AMM v4 program
pub const AMM_V4_PROGRAM_ID: Pubkey = pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");

/// Order-book market program the v4 pools are paired with
pub const MARKET_PROGRAM_ID: Pubkey = pubkey!("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX");

/// Authority PDA shared by every v4 pool (`b"amm authority"` under the AMM program)
pub const AMM_AUTHORITY: Pubkey = pubkey!("5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1");

/// Address lookup table published for v4 pools
pub const LOOKUP_TABLE_ACCOUNT: Pubkey = pubkey!("2bSf3akgd3LnnHZXKuvyk3CVycG1JZ6i6LRQLiBGX4Lp");

/// Public liquidity catalog
pub const DEFAULT_CATALOG_URL: &str = "https://api.raydium.io/v2/sdk/liquidity/mainnet.json";

pub const POOL_VERSION: u8 = 4;
pub const MARKET_VERSION: u8 = 3;

/// Instruction discriminators (protocol version 4)
pub mod discriminator {
    pub const ADD_LIQUIDITY: u8 = 3;
    pub const SWAP_BASE_IN: u8 = 9;
}

/// Trade fee charged on the input side of a swap
pub const TRADE_FEE_NUMERATOR: u64 = 25;
pub const TRADE_FEE_DENOMINATOR: u64 = 10_000;

/// Account list lengths mandated by the program
pub const SWAP_ACCOUNTS_LEN: usize = 17;
pub const ADD_LIQUIDITY_ACCOUNTS_LEN: usize = 14;

/// SPL token account / mint sizes
pub const TOKEN_ACCOUNT_LEN: usize = 165;
pub const MINT_LEN: usize = 82;
