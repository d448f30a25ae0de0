//! Session storage configuration.

use chassis_mongo::StoreConfig;

/// Default collection holding session records.
pub const SESSION_COLLECTION: &str = "chassis_sessions";

/// Session store configuration.
///
/// The database name is optional here but required by
/// [`crate::MongoSessionHandler::new`], which fails construction when it is
/// absent.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Store connection settings
    pub store: StoreConfig,
    /// Target database name
    pub database: Option<String>,
    /// Collection holding session records
    pub collection: String,
}

impl SessionConfig {
    /// Create a session configuration over the given store connection.
    ///
    /// # Examples
    ///
    /// ```
    /// use chassis_mongo::StoreConfig;
    /// use chassis_session::SessionConfig;
    ///
    /// let store = StoreConfig::new("localhost:27017").unwrap();
    /// let config = SessionConfig::new(store).with_database("app");
    /// assert_eq!(config.database.as_deref(), Some("app"));
    /// ```
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            database: None,
            collection: SESSION_COLLECTION.to_string(),
        }
    }

    /// Set the target database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Override the session collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_session_collection() {
        let config = SessionConfig::new(StoreConfig::new("localhost:27017").unwrap());
        assert_eq!(config.collection, SESSION_COLLECTION);
        assert!(config.database.is_none());
    }

    #[test]
    fn collection_can_be_overridden() {
        let config = SessionConfig::new(StoreConfig::new("localhost:27017").unwrap())
            .with_collection("tenant_sessions");
        assert_eq!(config.collection, "tenant_sessions");
    }
}
