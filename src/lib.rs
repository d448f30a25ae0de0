//! MongoDB storage extensions for Chassis applications.
//!
//! This umbrella crate re-exports the three member crates:
//!
//! - [`mongo`] - the document-store adapter (connect, select
//!   database/collection, CRUD passthroughs, collection statistics)
//! - [`cache`] - a cache backend storing key/value pairs with expiry
//!   (requires the `cache` feature)
//! - [`session`] - an HTTP session backend with bot-aware lifetimes,
//!   partial field updates, and tombstone-safe destruction (requires the
//!   `session` feature)
//!
//! # Features
//!
//! - `cache` - Enable the MongoDB cache backend
//! - `session` - Enable the MongoDB session backend
//! - `full` - Everything
//!
//! # Examples
//!
//! ```no_run
//! use chassis_mongodb::mongo::{MongoAdapter, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::new("localhost:27017")?;
//!     let mut adapter = MongoAdapter::connect(&config).await?;
//!     adapter.use_database("app").use_collection("users")?;
//!
//!     let count = adapter.count().await?;
//!     println!("{count} users");
//!
//!     Ok(())
//! }
//! ```

pub use chassis_mongo as mongo;

#[cfg(feature = "cache")]
pub use chassis_cache as cache;

#[cfg(feature = "session")]
pub use chassis_session as session;
