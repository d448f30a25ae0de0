//! MongoDB document-store adapter for Chassis applications.
//!
//! Provides a thin, passthrough layer over the MongoDB driver: connect once,
//! select a database and collection, and issue CRUD operations and collection
//! statistics queries. The cache and session backends
//! (`chassis-cache`, `chassis-session`) are built on this crate.
//!
//! Atomicity is delegated entirely to the server: this adapter adds no
//! client-side locking, pooling, or retry logic on top of the driver.
//!
//! # Examples
//!
//! ```no_run
//! use chassis_mongo::{MongoAdapter, StoreConfig};
//! use mongodb::bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::new("localhost:27017")?;
//!     let mut adapter = MongoAdapter::connect(&config).await?;
//!     adapter.use_database("app");
//!     adapter.ensure_collection("events").await?;
//!
//!     let id = adapter.insert_one(doc! { "kind": "signup" }).await?;
//!     println!("inserted {id}");
//!
//!     let stats = adapter.describe_collection("events").await?;
//!     println!("{} documents", stats.document_count);
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod error;

pub use adapter::{CollectionStats, MongoAdapter, UpdateOutcome};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adapter::{CollectionStats, MongoAdapter, UpdateOutcome};
    pub use crate::config::StoreConfig;
    pub use crate::error::{StoreError, StoreResult};
}
