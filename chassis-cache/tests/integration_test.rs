//! Integration tests for chassis-cache

use chassis_cache::*;
use chassis_mongo::StoreConfig;
use std::time::Duration;

fn store_config() -> StoreConfig {
    StoreConfig::new("localhost:27017").unwrap()
}

#[tokio::test]
async fn test_construction_requires_database() {
    let config = CacheConfig::new(store_config());
    let result = MongoCache::new(config).await;

    assert!(matches!(result, Err(CacheError::Config(_))));
}

#[test]
fn test_cache_error_display() {
    let err = CacheError::Config("cache database name is required".to_string());
    assert!(format!("{err}").contains("database name"));
}

// The tests below require a local MongoDB instance.
// Run them with: cargo test -- --ignored

async fn live_cache(collection: &str) -> MongoCache {
    let config = CacheConfig::new(store_config())
        .with_database("chassis_test")
        .with_collection(collection);
    MongoCache::new(config).await.unwrap()
}

#[tokio::test]
#[ignore]
async fn test_set_get_round_trip() {
    let cache = live_cache("cache_round_trip").await;
    cache.clear().await.unwrap();

    cache
        .set("greeting", "hello".into(), Duration::from_secs(60))
        .await
        .unwrap();

    let value = cache.get("greeting").await.unwrap();
    assert_eq!(value.unwrap().as_str().unwrap(), "hello");
    assert!(cache.exists("greeting").await.unwrap());

    cache.delete("greeting").await.unwrap();
    assert!(!cache.exists("greeting").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_set_overwrites_existing_entry() {
    let cache = live_cache("cache_overwrite").await;
    cache.clear().await.unwrap();

    cache
        .set("counter", 1.into(), Duration::from_secs(60))
        .await
        .unwrap();
    cache
        .set("counter", 2.into(), Duration::from_secs(60))
        .await
        .unwrap();

    let value = cache.get("counter").await.unwrap();
    assert_eq!(value.unwrap().as_i32().unwrap(), 2);
}

#[tokio::test]
#[ignore]
async fn test_expired_entries_are_invisible_then_purged() {
    let cache = live_cache("cache_expiry").await;
    cache.clear().await.unwrap();

    cache
        .set("ephemeral", "x".into(), Duration::from_millis(50))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(cache.get("ephemeral").await.unwrap().is_none());
    assert_eq!(cache.purge_expired().await.unwrap(), 1);
}
