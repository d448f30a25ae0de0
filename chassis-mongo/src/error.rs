//! Error types for document-store operations.

use thiserror::Error;

/// Result type for document-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Document-store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-level error
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation attempted before a database was selected
    #[error("No database selected")]
    NoDatabase,

    /// Operation attempted before a collection was selected
    #[error("No collection selected")]
    NoCollection,

    /// Generic error
    #[error("Store error: {0}")]
    Other(String),
}
