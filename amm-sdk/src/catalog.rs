//! Published liquidity catalog: download, lookup by market, and local caching.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::{
    client::CatalogStore,
    core::{PoolKeys, SdkError, SdkResult},
};

/// The catalog document; only the two pool lists are read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityCatalog {
    #[serde(default)]
    pub official: Vec<Value>,
    #[serde(default)]
    pub un_official: Vec<Value>,
}

impl LiquidityCatalog {
    /// First entry, official pools first, whose `marketId` equals `market_id`
    pub fn find_by_market(&self, market_id: &Pubkey) -> SdkResult<Option<PoolKeys>> {
        let wanted = market_id.to_string();
        let entry = self
            .official
            .iter()
            .chain(self.un_official.iter())
            .find(|entry| entry.get("marketId").and_then(Value::as_str) == Some(wanted.as_str()));

        match entry {
            Some(entry) => Ok(Some(serde_json::from_value(entry.clone())?)),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.official.len() + self.un_official.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Downloads the catalog and caches matching entries into a [`CatalogStore`]
pub struct CatalogFetcher {
    http: reqwest::Client,
    url: String,
    store: CatalogStore,
}

impl CatalogFetcher {
    pub fn new(url: impl Into<String>, store: CatalogStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            store,
        }
    }

    pub async fn download(&self) -> SdkResult<LiquidityCatalog> {
        debug!(url = %self.url, "Downloading liquidity catalog");
        let catalog: LiquidityCatalog = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if catalog.is_empty() {
            warn!(url = %self.url, "Liquidity catalog lists no pools");
        } else {
            info!(url = %self.url, pools = catalog.len(), "Downloaded liquidity catalog");
        }
        Ok(catalog)
    }

    /// Look up the pool paired with `market_id` and cache its keys
    pub async fn fetch_and_save(&self, market_id: &Pubkey) -> SdkResult<(PoolKeys, Vec<PathBuf>)> {
        let catalog = self.download().await?;
        let keys = catalog.find_by_market(market_id)?.ok_or_else(|| {
            SdkError::Catalog(format!("no pool for market {} in {}", market_id, self.url))
        })?;
        let written = self.store.save(&keys).await?;
        info!(market = %market_id, pool = %keys.id, "Saved pool keys");
        Ok((keys, written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pool_keys;

    #[test]
    fn test_find_by_market_prefers_official() {
        let official = sample_pool_keys();
        let mut unofficial = sample_pool_keys();
        unofficial.market_id = official.market_id;

        let catalog = LiquidityCatalog {
            official: vec![serde_json::to_value(&official).unwrap()],
            un_official: vec![serde_json::to_value(&unofficial).unwrap()],
        };
        let found = catalog.find_by_market(&official.market_id).unwrap().unwrap();
        assert_eq!(found.id, official.id);
        assert!(catalog
            .find_by_market(&Pubkey::new_unique())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_catalog_document_shape() {
        let keys = sample_pool_keys();
        let document = serde_json::json!({
            "name": "mainnet",
            "unOfficial": [serde_json::to_value(&keys).unwrap()],
        });
        let catalog: LiquidityCatalog = serde_json::from_value(document).unwrap();
        assert!(catalog.official.is_empty());
        assert!(!catalog.is_empty());
        assert!(LiquidityCatalog::default().is_empty());
        assert_eq!(catalog.find_by_market(&keys.market_id).unwrap(), Some(keys));
    }

    #[test]
    fn test_entry_without_lookup_table() {
        let keys = sample_pool_keys();
        let mut entry = serde_json::to_value(&keys).unwrap();
        entry
            .as_object_mut()
            .unwrap()
            .remove("lookupTableAccount");

        let catalog = LiquidityCatalog {
            official: vec![entry],
            un_official: vec![],
        };
        let found = catalog.find_by_market(&keys.market_id).unwrap().unwrap();
        assert_eq!(found.lookup_table_account, Pubkey::default());
    }
}
