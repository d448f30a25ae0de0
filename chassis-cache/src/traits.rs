//! Cache store trait definition.

use crate::error::CacheResult;
use async_trait::async_trait;
use mongodb::bson::Bson;
use std::time::Duration;

/// Cache store trait for key/value entries with expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value from the cache.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` for a live entry, `Ok(None)` when the key
    /// is absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Bson>>;

    /// Store a value under a key with the given time-to-live.
    ///
    /// Overwrites any existing entry for the key.
    async fn set(&self, key: &str, value: Bson, ttl: Duration) -> CacheResult<()>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check whether a live (non-expired) entry exists for the key.
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Remove every entry from the cache.
    ///
    /// **Warning:** this affects all keys in the backing collection.
    async fn clear(&self) -> CacheResult<()>;
}
