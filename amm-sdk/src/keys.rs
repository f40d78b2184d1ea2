//! Named signing keys.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use tracing::debug;

use crate::core::{ExecuteKeyPair, SdkError, SdkResult};

/// Source of keypairs by name
pub trait KeyProvider: Send + Sync {
    fn keypair(&self, name: &str) -> SdkResult<Keypair>;
}

/// Keys stored as `<dir>/<name>.json` (secret key byte array) next to
/// `<dir>/<name>_pub.json` (base58 string)
#[derive(Clone, Debug)]
pub struct FileKeyProvider {
    dir: PathBuf,
}

impl FileKeyProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn public_key(&self, name: &str) -> SdkResult<Pubkey> {
        let path = self.dir.join(format!("{}_pub.json", name));
        let content = std::fs::read_to_string(&path).map_err(|e| key_error(name, &path, e))?;
        let encoded: String = serde_json::from_str(&content).map_err(|e| key_error(name, &path, e))?;
        Pubkey::from_str(&encoded).map_err(|e| key_error(name, &path, e))
    }
}

fn key_error(name: &str, path: &Path, err: impl std::fmt::Display) -> SdkError {
    SdkError::KeyLoad {
        name: name.to_string(),
        reason: format!("{}: {}", path.display(), err),
    }
}

impl KeyProvider for FileKeyProvider {
    fn keypair(&self, name: &str) -> SdkResult<Keypair> {
        let path = self.dir.join(format!("{}.json", name));
        let keypair = read_keypair_file(&path).map_err(|e| key_error(name, &path, e))?;

        let expected = self.public_key(name)?;
        if keypair.pubkey() != expected {
            return Err(SdkError::KeyLoad {
                name: name.to_string(),
                reason: format!(
                    "secret key belongs to {}, public key file says {}",
                    keypair.pubkey(),
                    expected
                ),
            });
        }

        debug!(name, pubkey = %expected, "Loaded keypair");
        Ok(keypair)
    }
}

impl ExecuteKeyPair {
    /// Load every buyer and the liquidity signer by name
    pub fn from_provider<P: KeyProvider + ?Sized>(
        provider: &P,
        buy_names: &[String],
        liquidity_name: &str,
    ) -> SdkResult<Self> {
        let buy = buy_names
            .iter()
            .map(|name| provider.keypair(name))
            .collect::<SdkResult<Vec<_>>>()?;
        Self::new(buy, provider.keypair(liquidity_name)?)
    }
}
