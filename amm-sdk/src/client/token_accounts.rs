use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use tracing::debug;

use crate::{
    client::TokenAccountResolver,
    core::{PoolKeys, PoolSide, SdkResult, TokenRoute},
};

/// User token accounts a swap reads from and pays into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapTokenAccounts {
    pub route: TokenRoute,
    pub source: Pubkey,
    pub destination: Pubkey,
}

impl SwapTokenAccounts {
    /// The wrapped-native account touched by this swap, if any
    pub fn wrapped_native(&self) -> Option<Pubkey> {
        match self.route {
            TokenRoute::NativeIn => Some(self.source),
            TokenRoute::NativeOut => Some(self.destination),
            TokenRoute::NeitherNative => None,
        }
    }
}

pub async fn resolve_swap_accounts<T: TokenAccountResolver + ?Sized>(
    resolver: &T,
    owner: &Keypair,
    token_in: &Pubkey,
    token_out: &Pubkey,
) -> SdkResult<SwapTokenAccounts> {
    let wallet = owner.pubkey();
    let route = TokenRoute::of(token_in, token_out);

    let (source, destination) = match route {
        TokenRoute::NativeIn => (
            resolver
                .get_or_create(owner, &wallet, &spl_token::native_mint::id())
                .await?,
            resolver.get_or_create(owner, &wallet, token_out).await?,
        ),
        TokenRoute::NativeOut => {
            let destination = resolver.create_wrapped_native(owner, &wallet, 0).await?;
            let source = resolver.get_or_create(owner, &wallet, token_in).await?;
            (source, destination)
        }
        TokenRoute::NeitherNative => (
            resolver.get_or_create(owner, &wallet, token_in).await?,
            resolver.get_or_create(owner, &wallet, token_out).await?,
        ),
    };

    debug!(%wallet, ?route, %source, %destination, "Resolved swap token accounts");
    Ok(SwapTokenAccounts {
        route,
        source,
        destination,
    })
}

/// User token accounts a deposit draws from, in pool order, plus the LP receiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidityTokenAccounts {
    /// Route of the deposit seen as token A in, token B paired
    pub route: TokenRoute,
    pub base: Pubkey,
    pub quote: Pubkey,
    pub lp: Pubkey,
    /// Pool side of token A
    pub token_a_side: PoolSide,
}

impl LiquidityTokenAccounts {
    pub fn account(&self, side: PoolSide) -> Pubkey {
        match side {
            PoolSide::Base => self.base,
            PoolSide::Quote => self.quote,
        }
    }

    pub fn token_a(&self) -> Pubkey {
        self.account(self.token_a_side)
    }

    pub fn token_b(&self) -> Pubkey {
        self.account(self.token_a_side.opposite())
    }
}

/// Deposits always use the associated account, wrapped native included
pub async fn resolve_liquidity_accounts<T: TokenAccountResolver + ?Sized>(
    resolver: &T,
    owner: &Keypair,
    keys: &PoolKeys,
    token_a: &Pubkey,
) -> SdkResult<LiquidityTokenAccounts> {
    let wallet = owner.pubkey();
    let token_a_side = keys.side_of(token_a)?;
    let token_b = keys.mint(token_a_side.opposite());
    let route = TokenRoute::of(token_a, &token_b);

    let lp = resolver.get_or_create(owner, &wallet, &keys.lp_mint).await?;
    let account_a = resolver.get_or_create(owner, &wallet, token_a).await?;
    let account_b = resolver.get_or_create(owner, &wallet, &token_b).await?;

    let (base, quote) = match token_a_side {
        PoolSide::Base => (account_a, account_b),
        PoolSide::Quote => (account_b, account_a),
    };

    debug!(%wallet, ?route, %base, %quote, %lp, "Resolved deposit token accounts");
    Ok(LiquidityTokenAccounts {
        route,
        base,
        quote,
        lp,
        token_a_side,
    })
}
