use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};

use crate::{
    client::{LiquidityRequest, SendOptions, SwapRequest},
    core::{pubkey_serde, SdkError, SdkResult, Slippage, DEFAULT_CATALOG_URL},
};

/// Run configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// RPC endpoint
    pub rpc_url: String,

    /// processed, confirmed or finalized
    pub commitment: String,

    #[serde(default)]
    pub skip_preflight: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    pub signers: SignersConfig,

    pub swap: SwapConfig,

    #[serde(default)]
    pub liquidity: LiquidityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory holding `<name>.json` / `<name>_pub.json` key files
    pub key_dir: PathBuf,

    /// Directory of cached pool key files
    pub pool_info_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub url: String,
}

/// Where pool keys come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSource {
    OnChain,
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Pool (AMM) account
    #[serde(default, with = "pubkey_serde::option")]
    pub id: Option<Pubkey>,

    /// Market the catalog lookup is keyed by
    #[serde(default, with = "pubkey_serde::option")]
    pub market_id: Option<Pubkey>,

    pub source: PoolSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignersConfig {
    /// Key names of the buyers; the first one pays fees
    pub buy: Vec<String>,

    /// Key name of the liquidity provider
    pub liquidity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SwapConfig {
    #[serde(with = "pubkey_serde")]
    pub token_to_buy: Pubkey,

    /// Input amount as a decimal string
    pub amount: String,

    pub slippage_percent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LiquidityConfig {
    #[serde(with = "pubkey_serde")]
    pub input_mint: Pubkey,

    pub amount: String,

    pub slippage_percent: u64,

    pub enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn invalid(field: &str, reason: &str) -> SdkError {
    SdkError::InvalidParameters(format!("config `{}` {}", field, reason))
}

pub fn parse_commitment(value: &str) -> SdkResult<CommitmentLevel> {
    match value {
        "processed" => Ok(CommitmentLevel::Processed),
        "confirmed" => Ok(CommitmentLevel::Confirmed),
        "finalized" => Ok(CommitmentLevel::Finalized),
        other => Err(invalid(
            "commitment",
            &format!("must be processed, confirmed or finalized, got '{}'", other),
        )),
    }
}

impl AppConfig {
    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SdkError::Io(format!("failed to read config file {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            SdkError::Serialization(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::Serialization(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(invalid("rpc_url", "is empty"));
        }
        parse_commitment(&self.commitment)?;

        if self.signers.buy.is_empty() {
            return Err(invalid("signers.buy", "needs at least one key name"));
        }
        if self.signers.buy.iter().any(|name| name.trim().is_empty()) {
            return Err(invalid("signers.buy", "contains an empty key name"));
        }
        if self.signers.liquidity.trim().is_empty() {
            return Err(invalid("signers.liquidity", "is empty"));
        }

        Slippage::from_percent(self.swap.slippage_percent)?;
        if self.liquidity.enabled {
            Slippage::from_percent(self.liquidity.slippage_percent)?;
        }

        if self.pool.source == PoolSource::Catalog && self.catalog.url.trim().is_empty() {
            return Err(invalid("catalog.url", "is empty"));
        }

        Ok(())
    }

    pub fn commitment_config(&self) -> SdkResult<CommitmentConfig> {
        Ok(CommitmentConfig {
            commitment: parse_commitment(&self.commitment)?,
        })
    }

    pub fn send_options(&self) -> SdkResult<SendOptions> {
        Ok(SendOptions {
            skip_preflight: self.skip_preflight,
            preflight_commitment: parse_commitment(&self.commitment)?,
        })
    }

    pub fn pool_id(&self) -> SdkResult<Pubkey> {
        self.pool.id.ok_or_else(|| invalid("pool.id", "is not set"))
    }

    pub fn market_id(&self) -> SdkResult<Pubkey> {
        self.pool
            .market_id
            .ok_or_else(|| invalid("pool.market_id", "is not set"))
    }

    pub fn swap_request(&self) -> SdkResult<SwapRequest> {
        Ok(SwapRequest {
            token_out: self.swap.token_to_buy,
            amount_in: self.swap.amount.clone(),
            slippage: Slippage::from_percent(self.swap.slippage_percent)?,
        })
    }

    /// `None` when the deposit step is disabled
    pub fn liquidity_request(&self) -> SdkResult<Option<LiquidityRequest>> {
        if !self.liquidity.enabled {
            return Ok(None);
        }
        Ok(Some(LiquidityRequest {
            token_a: self.liquidity.input_mint,
            amount_a: self.liquidity.amount.clone(),
            slippage: Slippage::from_percent(self.liquidity.slippage_percent)?,
        }))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            skip_preflight: false,
            log_level: default_log_level(),
            paths: PathsConfig::default(),
            catalog: CatalogConfig::default(),
            pool: PoolConfig::default(),
            signers: SignersConfig {
                buy: vec!["buyer1".to_string()],
                liquidity: "liquidity".to_string(),
            },
            swap: SwapConfig {
                token_to_buy: spl_token::native_mint::id(),
                amount: "0.01".to_string(),
                slippage_percent: 1,
            },
            liquidity: LiquidityConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            key_dir: "keys".into(),
            pool_info_dir: "pool_info".into(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            id: None,
            market_id: None,
            source: PoolSource::OnChain,
        }
    }
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            input_mint: spl_token::native_mint::id(),
            amount: "0".to_string(),
            slippage_percent: 1,
            enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
rpc_url = "http://localhost:8899"
commitment = "confirmed"
log_level = "debug"

[paths]
key_dir = "./keys"
pool_info_dir = "./pool_info"

[pool]
id = "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2"
source = "catalog"

[signers]
buy = ["buyer1", "buyer2"]
liquidity = "lp"

[swap]
token_to_buy = "So11111111111111111111111111111111111111112"
amount = "0.04"
slippage_percent = 1

[liquidity]
input_mint = "So11111111111111111111111111111111111111112"
amount = "1.5"
slippage_percent = 2
enabled = true
"#;

    #[test]
    fn test_parse_example() {
        let config: AppConfig = toml::from_str(EXAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.pool.source, PoolSource::Catalog);
        assert!(config.pool.market_id.is_none());
        assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
        assert_eq!(config.signers.buy.len(), 2);
        assert_eq!(config.swap.token_to_buy, spl_token::native_mint::id());
        assert!(!config.skip_preflight);

        let swap = config.swap_request().unwrap();
        assert_eq!(swap.slippage, Slippage::new(1, 100).unwrap());
        let liquidity = config.liquidity_request().unwrap().unwrap();
        assert_eq!(liquidity.amount_a, "1.5");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ammv4.toml");

        let mut config = AppConfig::default();
        config.pool.id = Some(Pubkey::new_unique());
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.signers.buy.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.swap.slippage_percent = 100;
        assert!(matches!(
            config.validate(),
            Err(SdkError::InvalidSlippage { .. })
        ));

        let mut config = AppConfig::default();
        config.commitment = "fast".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_send_options() {
        let mut config = AppConfig::default();
        config.commitment = "finalized".to_string();
        config.skip_preflight = true;
        let options = config.send_options().unwrap();
        assert!(options.skip_preflight);
        assert_eq!(options.preflight_commitment, CommitmentLevel::Finalized);
        assert!(config.liquidity_request().unwrap().is_none());
        assert!(config.pool_id().is_err());
    }
}
