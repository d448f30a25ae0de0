//! Passthrough adapter over the MongoDB driver.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use futures::stream::TryStreamExt;
use log::debug;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde::Serialize;

/// Outcome of a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents matched by the filter
    pub matched: u64,
    /// Number of documents actually modified
    pub modified: u64,
}

/// Collection statistics, from the `collStats` command.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    /// Fully qualified collection namespace
    pub collection_name: String,
    /// Number of documents in the collection
    pub document_count: i64,
    /// Storage size in bytes
    pub storage_size_bytes: i64,
    /// Per-index size map
    pub index_sizes: Document,
}

/// Thin adapter over a MongoDB connection.
///
/// Holds one shared client handle, established once at construction and
/// reused across requests, plus the currently selected database and
/// collection. Consumers that need their own collection handle (the cache
/// and session backends) take one via [`MongoAdapter::collection`].
///
/// # Examples
///
/// ```no_run
/// use chassis_mongo::{MongoAdapter, StoreConfig};
/// use mongodb::bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StoreConfig::new("localhost:27017")?.with_auth("app", "secret");
///     let mut adapter = MongoAdapter::connect(&config).await?;
///     adapter.use_database("app").use_collection("users")?;
///
///     let user = adapter.find_one(doc! { "name": "alice" }).await?;
///     println!("{user:?}");
///
///     Ok(())
/// }
/// ```
pub struct MongoAdapter {
    client: Client,
    database: Option<Database>,
    collection: Option<Collection<Document>>,
}

impl MongoAdapter {
    /// Connect to the server described by `config`.
    ///
    /// The driver connects lazily, so connectivity is verified here with a
    /// `ping` command; a handler constructed from a dead server fails
    /// immediately instead of on its first operation.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(config.connection_string())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!("connected to MongoDB at {}", config.host);

        Ok(Self {
            client,
            database: None,
            collection: None,
        })
    }

    /// Select the working database. Clears any collection selection.
    pub fn use_database(&mut self, name: &str) -> &mut Self {
        self.database = Some(self.client.database(name));
        self.collection = None;
        self
    }

    /// Select the working collection within the selected database.
    pub fn use_collection(&mut self, name: &str) -> StoreResult<&mut Self> {
        let database = self.database.as_ref().ok_or(StoreError::NoDatabase)?;
        self.collection = Some(database.collection::<Document>(name));
        Ok(self)
    }

    fn database(&self) -> StoreResult<&Database> {
        self.database.as_ref().ok_or(StoreError::NoDatabase)
    }

    /// Handle to the selected collection.
    ///
    /// Collection handles are cheap clones of the shared client; consumers
    /// issuing their own atomic operations hold one of these.
    pub fn collection(&self) -> StoreResult<Collection<Document>> {
        self.collection.clone().ok_or(StoreError::NoCollection)
    }

    /// Names of all collections in the selected database.
    pub async fn list_collections(&self) -> StoreResult<Vec<String>> {
        Ok(self.database()?.list_collection_names().await?)
    }

    /// Create the collection if it does not exist, then select it.
    pub async fn ensure_collection(&mut self, name: &str) -> StoreResult<()> {
        let database = self.database.as_ref().ok_or(StoreError::NoDatabase)?;

        let existing = database.list_collection_names().await?;
        if !existing.iter().any(|collection| collection == name) {
            database.create_collection(name).await?;
            debug!("created collection {name}");
        }

        self.collection = Some(database.collection::<Document>(name));
        Ok(())
    }

    /// Find a single document matching the filter.
    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.collection()?.find_one(filter).await?)
    }

    /// Find all documents matching the filter.
    pub async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let cursor = self.collection()?.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Insert one document, returning its id.
    pub async fn insert_one(&self, document: Document) -> StoreResult<Bson> {
        let result = self.collection()?.insert_one(document).await?;
        Ok(result.inserted_id)
    }

    /// Insert several documents, returning their ids in input order.
    pub async fn insert_many(&self, documents: Vec<Document>) -> StoreResult<Vec<Bson>> {
        let result = self.collection()?.insert_many(documents).await?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    /// `$set` the given fields on every document matching the filter.
    pub async fn update_many(
        &self,
        filter: Document,
        fields: Document,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection()?
            .update_many(filter, doc! { "$set": fields })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    /// Delete every document matching the filter, returning the count.
    pub async fn delete_many(&self, filter: Document) -> StoreResult<u64> {
        let result = self.collection()?.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    /// Number of documents in the selected collection.
    pub async fn count(&self) -> StoreResult<u64> {
        Ok(self.collection()?.count_documents(doc! {}).await?)
    }

    /// Describe a collection in the selected database.
    pub async fn describe_collection(&self, name: &str) -> StoreResult<CollectionStats> {
        let stats = self
            .database()?
            .run_command(doc! { "collStats": name })
            .await?;

        Ok(CollectionStats {
            collection_name: stats.get_str("ns").unwrap_or(name).to_string(),
            document_count: numeric(&stats, "count"),
            storage_size_bytes: numeric(&stats, "storageSize"),
            index_sizes: stats
                .get_document("indexSizes")
                .ok()
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// `collStats` reports counters as int32, int64, or double depending on size.
fn numeric(stats: &Document, key: &str) -> i64 {
    match stats.get(key) {
        Some(Bson::Int32(value)) => i64::from(*value),
        Some(Bson::Int64(value)) => *value,
        Some(Bson::Double(value)) => *value as i64,
        _ => 0,
    }
}
