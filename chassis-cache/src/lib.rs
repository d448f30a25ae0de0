//! MongoDB cache backend for Chassis applications.
//!
//! Key/value entries with expiry, stored one document per key and read
//! through a server-side expiry filter. Expiry mechanics are deliberately
//! simple: set is an upsert with a computed expiry timestamp, get ignores
//! entries past it.
//!
//! # Examples
//!
//! ```no_run
//! use chassis_cache::{CacheConfig, CacheStore, MongoCache};
//! use chassis_mongo::StoreConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = StoreConfig::new("localhost:27017")?.with_auth("app", "secret");
//!     let config = CacheConfig::new(store).with_database("app");
//!     let cache = MongoCache::new(config).await?;
//!
//!     cache.set("user:42", "alice".into(), Duration::from_secs(3600)).await?;
//!     assert!(cache.exists("user:42").await?);
//!
//!     cache.delete("user:42").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mongo_cache;
pub mod traits;

pub use config::{CACHE_COLLECTION, CacheConfig};
pub use error::{CacheError, CacheResult};
pub use mongo_cache::MongoCache;
pub use traits::CacheStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::mongo_cache::MongoCache;
    pub use crate::traits::CacheStore;
}
