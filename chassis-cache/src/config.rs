//! Cache configuration.

use chassis_mongo::StoreConfig;

/// Default collection holding cache entries.
pub const CACHE_COLLECTION: &str = "chassis_cache";

/// Cache backend configuration.
///
/// The database name is optional here but required by
/// [`crate::MongoCache::new`], which fails construction when it is absent.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Store connection settings
    pub store: StoreConfig,
    /// Target database name
    pub database: Option<String>,
    /// Collection holding cache entries
    pub collection: String,
}

impl CacheConfig {
    /// Create a cache configuration over the given store connection.
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            database: None,
            collection: CACHE_COLLECTION.to_string(),
        }
    }

    /// Set the target database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Override the cache collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_cache_collection() {
        let config = CacheConfig::new(StoreConfig::new("localhost:27017").unwrap());
        assert_eq!(config.collection, CACHE_COLLECTION);
        assert!(config.database.is_none());
    }
}
