//! MongoDB session handler implementation.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::lifetime::compute_lifetime;
use crate::record::SessionRecord;
use crate::traits::SessionHandler;
use crate::update::SessionData;
use async_trait::async_trait;
use chassis_mongo::MongoAdapter;
use log::warn;
use mongodb::Collection;
use mongodb::bson::{DateTime, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// MongoDB-backed session handler.
///
/// Sessions are stored as structured documents, one per session id, and all
/// mutual exclusion is delegated to the server's per-document atomicity:
/// `read` is a single find-and-increment, `write` and `destroy` are
/// conditional updates that never upsert, and `gc` is one bulk delete. A
/// session destroyed while a write is in flight stays destroyed, because the
/// write matches nothing.
///
/// # Examples
///
/// ```no_run
/// use chassis_mongo::StoreConfig;
/// use chassis_session::{MongoSessionHandler, SessionData, SessionHandler};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = StoreConfig::new("localhost:27017")?;
///     let config = chassis_session::SessionConfig::new(store).with_database("app");
///     let handler = MongoSessionHandler::new(config).await?;
///
///     handler.set_user_agent("Mozilla/5.0");
///     let payload = handler.read("session-id").await?;
///
///     let mut data = SessionData::new();
///     data.set("auth", "user_id", 42);
///     handler.write("session-id", data).await?;
///
///     Ok(())
/// }
/// ```
pub struct MongoSessionHandler {
    collection: Collection<Document>,
    /// Read count captured by `read`, consumed by the following `write`
    reads: AtomicI64,
    /// Current client user agent, fed into the lifetime policy
    user_agent: RwLock<String>,
}

impl MongoSessionHandler {
    /// Create a new MongoDB session handler.
    ///
    /// Fails fast when the target database is not configured or the server
    /// is unreachable; no session storage is usable without either.
    pub async fn new(config: SessionConfig) -> SessionResult<Self> {
        let database = config.database.as_deref().ok_or_else(|| {
            SessionError::Config("session store database name is required".to_string())
        })?;

        let mut adapter = MongoAdapter::connect(&config.store)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;
        adapter.use_database(database);
        adapter.ensure_collection(&config.collection).await?;

        Ok(Self {
            collection: adapter.collection()?,
            reads: AtomicI64::new(0),
            user_agent: RwLock::new(String::new()),
        })
    }

    /// Record the user agent of the request being served.
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        if let Ok(mut guard) = self.user_agent.write() {
            *guard = user_agent.into();
        }
    }

    fn current_user_agent(&self) -> String {
        self.user_agent
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn captured_reads(&self) -> u32 {
        self.reads
            .load(Ordering::Relaxed)
            .try_into()
            .unwrap_or(u32::MAX)
    }

    /// Map a driver result onto the acknowledgement contract: connection
    /// loss propagates, anything else degrades to an unacknowledged call.
    fn acknowledge<T>(operation: &str, result: mongodb::error::Result<T>) -> SessionResult<bool> {
        match result {
            Ok(_) => Ok(true),
            Err(error) => match &*error.kind {
                ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => {
                    Err(SessionError::Connection(error.to_string()))
                }
                _ => {
                    warn!("session {operation} not acknowledged: {error}");
                    Ok(false)
                }
            },
        }
    }
}

#[async_trait]
impl SessionHandler for MongoSessionHandler {
    async fn open(&self, _path: &str, _name: &str) -> SessionResult<bool> {
        Ok(true)
    }

    async fn close(&self) -> SessionResult<bool> {
        Ok(true)
    }

    async fn read(&self, id: &str) -> SessionResult<Document> {
        let result = self
            .collection
            .find_one_and_update(doc! { "_id": id }, read_update())
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        let Some(document) = result else {
            // Upsert with return-after always yields a document; treat a
            // missing one as an empty session rather than failing the request.
            return Ok(Document::new());
        };

        let record: SessionRecord = mongodb::bson::from_document(document)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        if record.destroyed {
            // Never surface payload through a tombstone.
            self.reads.store(1, Ordering::Relaxed);
            return Ok(Document::new());
        }

        self.reads.store(record.reads.max(1), Ordering::Relaxed);
        Ok(record.data)
    }

    async fn write(&self, id: &str, data: SessionData) -> SessionResult<bool> {
        if data.is_empty() {
            // Do not create or touch a record for an empty session.
            return Ok(true);
        }

        let user_agent = self.current_user_agent();
        let lifetime = compute_lifetime(self.captured_reads(), &user_agent);

        let mut compiled = data.compile();
        compiled.to_set.insert("updated_at", DateTime::now());
        compiled.to_set.insert("lifetime", lifetime);
        compiled.to_set.insert("user_agent", user_agent);

        // Not an upsert, so a destroyed or absent session is never
        // resurrected; matching zero documents is still success.
        let result = self
            .collection
            .update_one(doc! { "_id": id }, compiled.into_document())
            .await;
        Self::acknowledge("write", result)
    }

    async fn destroy(&self, id: &str) -> SessionResult<bool> {
        let update = doc! {
            "$set": { "destroyed": true, "destroyed_at": DateTime::now() }
        };

        // Not an upsert: destroying an absent session stays a no-op.
        let result = self.collection.update_one(doc! { "_id": id }, update).await;
        Self::acknowledge("destroy", result)
    }

    async fn gc(&self, max_lifetime: i64) -> SessionResult<bool> {
        let filter = gc_filter(max_lifetime, DateTime::now());
        let result = self.collection.delete_many(filter).await;
        Self::acknowledge("gc", result)
    }
}

/// Update applied atomically by the read path: bump the read counter and
/// stamp the access time in the same server-side operation.
fn read_update() -> Document {
    doc! {
        "$set": { "last_read_at": DateTime::now() },
        "$inc": { "reads": 1_i64 },
    }
}

/// Garbage-collection filter.
///
/// Matches tombstones older than the global retention horizon, plus records
/// idle past their own stored lifetime. The second clause compares
/// `last_read_at` against `now - lifetime` server-side with `$expr`, so
/// expiry is per-session rather than global; `lifetime` is in seconds and
/// BSON date arithmetic is in milliseconds.
fn gc_filter(max_lifetime: i64, now: DateTime) -> Document {
    let destroyed_before = DateTime::from_millis(
        now.timestamp_millis()
            .saturating_sub(max_lifetime.saturating_mul(1000)),
    );

    doc! {
        "$or": [
            {
                "destroyed": true,
                "destroyed_at": { "$lt": destroyed_before },
            },
            {
                "$expr": {
                    "$lt": [
                        "$last_read_at",
                        { "$subtract": [now, { "$multiply": ["$lifetime", 1000] }] },
                    ],
                },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_update_increments_atomically() {
        let update = read_update();

        assert_eq!(
            update
                .get_document("$inc")
                .unwrap()
                .get_i64("reads")
                .unwrap(),
            1
        );
        assert!(
            update
                .get_document("$set")
                .unwrap()
                .contains_key("last_read_at")
        );
    }

    #[test]
    fn gc_filter_has_disjoint_clauses() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let filter = gc_filter(1440, now);

        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);

        let tombstone = clauses[0].as_document().unwrap();
        assert!(tombstone.get_bool("destroyed").unwrap());
        let cutoff = tombstone
            .get_document("destroyed_at")
            .unwrap()
            .get_datetime("$lt")
            .unwrap();
        assert_eq!(cutoff.timestamp_millis(), 1_700_000_000_000 - 1440 * 1000);

        // The live clause must use the per-record lifetime, not the gc
        // parameter.
        let live = clauses[1].as_document().unwrap();
        let expr = live.get_document("$expr").unwrap();
        let comparison = expr.get_array("$lt").unwrap();
        assert_eq!(comparison[0].as_str().unwrap(), "$last_read_at");
        let offset = comparison[1].as_document().unwrap();
        let subtract = offset.get_array("$subtract").unwrap();
        assert_eq!(subtract[0].as_datetime().unwrap(), &now);
        let scaled = subtract[1].as_document().unwrap();
        let multiply = scaled.get_array("$multiply").unwrap();
        assert_eq!(multiply[0].as_str().unwrap(), "$lifetime");
    }
}
