//! Local catalog cache: file layout, lookups by either id and misses

use amm_v4_sdk::{
    catalog::LiquidityCatalog,
    client::{CatalogStore, PoolKeySource},
    core::{PoolKeys, SdkError},
    testing::sample_pool_keys,
};
use solana_sdk::pubkey::Pubkey;
use tempfile::TempDir;

#[tokio::test]
async fn test_save_writes_market_and_pool_files() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path().join("pool_info"));
    let keys = sample_pool_keys();

    let written = store.save(&keys).await.unwrap();
    assert_eq!(
        written,
        vec![store.path_for(&keys.market_id), store.path_for(&keys.id)]
    );

    let content = std::fs::read_to_string(&written[0]).unwrap();
    assert!(content.starts_with("{\n    \""));
    assert!(content.contains(&format!("\"marketId\": \"{}\"", keys.market_id)));
    assert_eq!(content, std::fs::read_to_string(&written[1]).unwrap());
}

#[tokio::test]
async fn test_load_by_market_or_pool() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let keys = sample_pool_keys();
    store.save(&keys).await.unwrap();

    assert_eq!(store.load(&keys.market_id).await.unwrap(), Some(keys.clone()));
    assert_eq!(store.load(&keys.id).await.unwrap(), Some(keys.clone()));
    assert_eq!(store.load(&Pubkey::new_unique()).await.unwrap(), None);

    assert_eq!(store.pool_keys(&keys.id).await.unwrap(), keys);
    assert_eq!(store.pool_keys(&keys.market_id).await.unwrap(), keys);
}

#[tokio::test]
async fn test_missing_entry_is_pool_not_found() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let pool_id = Pubkey::new_unique();

    let result = store.pool_keys(&pool_id).await;
    assert!(matches!(result, Err(SdkError::PoolNotFound(id)) if id == pool_id));
}

#[tokio::test]
async fn test_mismatched_entry_is_rejected() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let keys = sample_pool_keys();
    let other = Pubkey::new_unique();
    std::fs::write(
        store.path_for(&other),
        serde_json::to_vec(&keys).unwrap(),
    )
    .unwrap();

    let result = store.pool_keys(&other).await;
    assert!(matches!(result, Err(SdkError::Catalog(_))));
}

#[tokio::test]
async fn test_corrupt_entry_is_serialization_error() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let pool_id = Pubkey::new_unique();
    std::fs::write(store.path_for(&pool_id), b"null").unwrap();

    let result = store.load(&pool_id).await;
    assert!(matches!(result, Err(SdkError::Serialization(_))));
}

#[tokio::test]
async fn test_catalog_entry_to_cache() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let keys = sample_pool_keys();

    let catalog: LiquidityCatalog = serde_json::from_value(serde_json::json!({
        "official": [serde_json::to_value(sample_pool_keys()).unwrap()],
        "unOfficial": [serde_json::to_value(&keys).unwrap()],
    }))
    .unwrap();
    let found: PoolKeys = catalog.find_by_market(&keys.market_id).unwrap().unwrap();
    store.save(&found).await.unwrap();

    assert_eq!(store.pool_keys(&keys.id).await.unwrap(), keys);
}
