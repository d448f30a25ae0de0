//! MongoDB session storage for Chassis applications.
//!
//! Sessions are stored as structured documents, one per session id, and the
//! handler implements the classic open/close/read/write/destroy/gc lifecycle:
//!
//! - **Atomic reads** - `read` creates or bumps the record with a single
//!   server-side find-and-increment, so concurrent requests never lose a
//!   read count.
//! - **Partial writes** - session mutations are logged per namespace and
//!   compiled into field-level `$set`/`$unset` maps
//!   ([`SessionData::compile`]), so a write touches only what changed.
//! - **Bot-aware lifetimes** - TTL grows cubically with the read count and
//!   collapses to 30 seconds for crawler user agents
//!   ([`compute_lifetime`]).
//! - **Tombstones** - `destroy` marks the record instead of deleting it, and
//!   the write path never upserts, so a destroyed session cannot be
//!   resurrected by an in-flight write. Garbage collection eventually
//!   removes tombstones and expired records in one bulk sweep.
//!
//! # Examples
//!
//! ```no_run
//! use chassis_mongo::StoreConfig;
//! use chassis_session::{MongoSessionHandler, SessionConfig, SessionData, SessionHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = StoreConfig::new("localhost:27017")?.with_auth("app", "secret");
//!     let config = SessionConfig::new(store).with_database("app");
//!
//!     let handler = MongoSessionHandler::new(config).await?;
//!     handler.set_user_agent("Mozilla/5.0");
//!
//!     // Read creates the session on first access.
//!     let payload = handler.read("session-id").await?;
//!     println!("{payload:?}");
//!
//!     // Log mutations and persist them as a partial update.
//!     let mut data = SessionData::new();
//!     data.set("auth", "user_id", 42);
//!     data.unset("auth", "login_error");
//!     handler.write("session-id", data).await?;
//!
//!     // Logout: tombstone the record.
//!     handler.destroy("session-id").await?;
//!
//!     // Periodic maintenance: drop tombstones older than a day and any
//!     // session idle past its own lifetime.
//!     handler.gc(86_400).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod lifetime;
pub mod record;
pub mod traits;
pub mod update;

pub use config::{SESSION_COLLECTION, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use handler::MongoSessionHandler;
pub use lifetime::{BOT_LIFETIME, MAX_LIFETIME, compute_lifetime};
pub use record::SessionRecord;
pub use traits::{SessionHandler, generate_session_id};
pub use update::{CompiledUpdate, Mutation, Operation, SessionData};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::handler::MongoSessionHandler;
    pub use crate::lifetime::compute_lifetime;
    pub use crate::record::SessionRecord;
    pub use crate::traits::{SessionHandler, generate_session_id};
    pub use crate::update::SessionData;
}
