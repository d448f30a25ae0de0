//! MongoDB cache backend implementation.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;
use async_trait::async_trait;
use chassis_mongo::MongoAdapter;
use log::debug;
use mongodb::Collection;
use mongodb::bson::{Bson, DateTime, Document, doc};
use std::time::Duration;

/// MongoDB-backed cache store.
///
/// One document per key: `{ key, value, expiry }`. Reads filter on `expiry`
/// server-side, so an expired entry is invisible immediately; physical
/// removal is deferred to [`MongoCache::purge_expired`].
///
/// # Examples
///
/// ```no_run
/// use chassis_cache::{CacheConfig, CacheStore, MongoCache};
/// use chassis_mongo::StoreConfig;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = StoreConfig::new("localhost:27017")?;
///     let config = CacheConfig::new(store).with_database("app");
///     let cache = MongoCache::new(config).await?;
///
///     cache.set("greeting", "hello".into(), Duration::from_secs(60)).await?;
///     let value = cache.get("greeting").await?;
///     println!("{value:?}");
///
///     Ok(())
/// }
/// ```
pub struct MongoCache {
    collection: Collection<Document>,
}

impl MongoCache {
    /// Create a new MongoDB cache store.
    ///
    /// Fails when the target database is not configured or the server is
    /// unreachable.
    pub async fn new(config: CacheConfig) -> CacheResult<Self> {
        let database = config
            .database
            .as_deref()
            .ok_or_else(|| CacheError::Config("cache database name is required".to_string()))?;

        let mut adapter = MongoAdapter::connect(&config.store)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        adapter.use_database(database);
        adapter.ensure_collection(&config.collection).await?;

        Ok(Self {
            collection: adapter.collection()?,
        })
    }

    /// Physically remove expired entries, returning the count.
    ///
    /// Optional maintenance: expired entries are already invisible to
    /// [`CacheStore::get`].
    pub async fn purge_expired(&self) -> CacheResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "expiry": { "$lt": DateTime::now() } })
            .await?;

        debug!("purged {} expired cache entries", result.deleted_count);
        Ok(result.deleted_count)
    }
}

#[async_trait]
impl CacheStore for MongoCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bson>> {
        let found = self
            .collection
            .find_one(doc! { "key": key, "expiry": { "$gt": DateTime::now() } })
            .await?;

        Ok(found.and_then(|entry| entry.get("value").cloned()))
    }

    async fn set(&self, key: &str, value: Bson, ttl: Duration) -> CacheResult<()> {
        let expiry = DateTime::from_millis(
            DateTime::now()
                .timestamp_millis()
                .saturating_add(ttl.as_millis().min(i64::MAX as u128) as i64),
        );

        self.collection
            .update_one(
                doc! { "key": key },
                doc! { "$set": { "value": value, "expiry": expiry } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.collection.delete_one(doc! { "key": key }).await?;
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}
