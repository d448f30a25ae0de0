//! Session record schema.

use mongodb::bson::{DateTime, Document};
use serde::{Deserialize, Serialize};

/// One stored session document.
///
/// A record is created implicitly by the read path's upsert with `reads = 1`
/// and is only ever removed by garbage collection. `destroyed` and
/// `destroyed_at` form the tombstone: once set, the write path (which never
/// upserts) cannot bring the session back or touch its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Namespaced session payload, addressed with dotted paths on writes
    #[serde(default)]
    pub data: Document,

    /// Read count since creation; incremented only by the read path's `$inc`
    #[serde(default)]
    pub reads: i64,

    /// Timestamp of the most recent read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read_at: Option<DateTime>,

    /// TTL in seconds, recomputed by the lifetime policy on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<i64>,

    /// Last observed client user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Timestamp of the most recent write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    /// Tombstone marker
    #[serde(default)]
    pub destroyed: bool,

    /// When the tombstone was placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroyed_at: Option<DateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn deserializes_minimal_upserted_record() {
        // Shape produced by the read path's first upsert.
        let record: SessionRecord = from_document(doc! {
            "_id": "abc123",
            "reads": 1_i32,
            "last_read_at": DateTime::now(),
        })
        .unwrap();

        assert_eq!(record.id, "abc123");
        assert_eq!(record.reads, 1);
        assert!(record.data.is_empty());
        assert!(!record.destroyed);
        assert!(record.destroyed_at.is_none());
    }

    #[test]
    fn deserializes_tombstone() {
        let record: SessionRecord = from_document(doc! {
            "_id": "gone",
            "reads": 12_i64,
            "destroyed": true,
            "destroyed_at": DateTime::now(),
        })
        .unwrap();

        assert!(record.destroyed);
        assert!(record.destroyed_at.is_some());
    }

    #[test]
    fn serialization_skips_absent_metadata() {
        let record = SessionRecord {
            id: "fresh".to_string(),
            data: Document::new(),
            reads: 1,
            last_read_at: None,
            lifetime: None,
            user_agent: None,
            updated_at: None,
            destroyed: false,
            destroyed_at: None,
        };

        let document = mongodb::bson::to_document(&record).unwrap();
        assert!(!document.contains_key("lifetime"));
        assert!(!document.contains_key("destroyed_at"));
        assert_eq!(document.get_str("_id").unwrap(), "fresh");
    }
}
