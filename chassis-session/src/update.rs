//! Session update compilation.
//!
//! Session mutations arrive as a per-namespace log and are compiled into the
//! minimal pair of `$set`/`$unset` field maps, so a write touches only the
//! fields that changed instead of rewriting the whole document.

use mongodb::bson::{Bson, Document};
use std::collections::BTreeMap;

/// Namespaces starting with this prefix carry a raw value written directly,
/// not an operation list.
pub const DIRECT_PREFIX: &str = "_";

/// Key carrying the operation list in the dynamic wire format.
pub const OPERATIONS_KEY: &str = "__operations";

/// A single logged mutation within a namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Write `value` at `key`
    Set { key: String, value: Bson },
    /// Remove the field at `key`
    Unset { key: String },
}

/// What a namespace carries: a raw value written as-is, or a replayable
/// operation list.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Direct(Bson),
    Operations(Vec<Operation>),
}

/// The namespaced mutation log for one session write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    namespaces: BTreeMap<String, Mutation>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the log carries any mutations at all.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Record a raw value for a direct-write namespace.
    pub fn insert_direct(&mut self, namespace: impl Into<String>, value: impl Into<Bson>) {
        self.namespaces
            .insert(namespace.into(), Mutation::Direct(value.into()));
    }

    /// Log a `set` operation under a namespace.
    pub fn set(&mut self, namespace: &str, key: impl Into<String>, value: impl Into<Bson>) {
        self.operations_mut(namespace).push(Operation::Set {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Log an `unset` operation under a namespace.
    pub fn unset(&mut self, namespace: &str, key: impl Into<String>) {
        self.operations_mut(namespace)
            .push(Operation::Unset { key: key.into() });
    }

    fn operations_mut(&mut self, namespace: &str) -> &mut Vec<Operation> {
        let entry = self
            .namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| Mutation::Operations(Vec::new()));

        // A namespace holds one mutation kind; logging operations replaces a
        // previously recorded direct value.
        if !matches!(entry, Mutation::Operations(_)) {
            *entry = Mutation::Operations(Vec::new());
        }
        let Mutation::Operations(operations) = entry else {
            unreachable!();
        };
        operations
    }

    /// Parse the dynamic wire format.
    ///
    /// Namespaces starting with [`DIRECT_PREFIX`] are direct values;
    /// namespaces carrying an [`OPERATIONS_KEY`] array are operation lists;
    /// anything else is silently ignored, as are malformed operations.
    pub fn from_document(document: &Document) -> Self {
        let mut data = Self::new();

        for (namespace, value) in document {
            if namespace.starts_with(DIRECT_PREFIX) {
                data.insert_direct(namespace.clone(), value.clone());
                continue;
            }

            let Some(operations) = value
                .as_document()
                .and_then(|nested| nested.get_array(OPERATIONS_KEY).ok())
            else {
                continue;
            };

            for operation in operations.iter().filter_map(Bson::as_document) {
                let Ok(key) = operation.get_str("key") else {
                    continue;
                };
                match operation.get_str("type") {
                    Ok("set") => data.set(
                        namespace,
                        key,
                        operation.get("value").cloned().unwrap_or(Bson::Null),
                    ),
                    Ok("unset") => data.unset(namespace, key),
                    _ => {}
                }
            }
        }

        data
    }

    /// Compile the log into disjoint `$set`/`$unset` field maps.
    ///
    /// Operations replay in order through a per-path accumulator, so the last
    /// declared intent for a path wins: an `unset` retracts an earlier `set`
    /// of the same path, and a later `set` retracts a pending `unset`.
    pub fn compile(&self) -> CompiledUpdate {
        let mut intents: BTreeMap<String, Intent> = BTreeMap::new();

        for (namespace, mutation) in &self.namespaces {
            match mutation {
                Mutation::Direct(value) => {
                    intents.insert(format!("data.{namespace}"), Intent::Set(value.clone()));
                }
                Mutation::Operations(operations) => {
                    for operation in operations {
                        match operation {
                            Operation::Set { key, value } => {
                                intents.insert(
                                    format!("data.{namespace}.{key}"),
                                    Intent::Set(value.clone()),
                                );
                            }
                            Operation::Unset { key } => {
                                intents.insert(format!("data.{namespace}.{key}"), Intent::Unset);
                            }
                        }
                    }
                }
            }
        }

        let mut compiled = CompiledUpdate::default();
        for (path, intent) in intents {
            match intent {
                Intent::Set(value) => compiled.to_set.insert(path, value),
                Intent::Unset => compiled.to_unset.insert(path, Bson::Int32(1)),
            };
        }
        compiled
    }
}

/// Last declared intent for a dotted path.
enum Intent {
    Set(Bson),
    Unset,
}

/// Field-level update maps produced by [`SessionData::compile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledUpdate {
    /// Dotted path -> value, for `$set`
    pub to_set: Document,
    /// Dotted path -> sentinel, for `$unset`
    pub to_unset: Document,
}

impl CompiledUpdate {
    pub fn is_empty(&self) -> bool {
        self.to_set.is_empty() && self.to_unset.is_empty()
    }

    /// Render the MongoDB update document, omitting empty operator maps.
    pub fn into_document(self) -> Document {
        let mut update = Document::new();
        if !self.to_set.is_empty() {
            update.insert("$set", self.to_set);
        }
        if !self.to_unset.is_empty() {
            update.insert("$unset", self.to_unset);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn compiles_set_operations_to_dotted_paths() {
        let mut data = SessionData::new();
        data.set("auth", "user_id", 42);
        data.set("auth", "name", "alice");

        let compiled = data.compile();
        assert_eq!(compiled.to_set.get_i32("data.auth.user_id").unwrap(), 42);
        assert_eq!(compiled.to_set.get_str("data.auth.name").unwrap(), "alice");
        assert!(compiled.to_unset.is_empty());
    }

    #[test]
    fn unset_after_set_wins() {
        let mut data = SessionData::new();
        data.set("ns", "a", 1);
        data.unset("ns", "a");

        let compiled = data.compile();
        assert!(!compiled.to_set.contains_key("data.ns.a"));
        assert_eq!(compiled.to_unset.get_i32("data.ns.a").unwrap(), 1);
    }

    #[test]
    fn set_after_unset_wins() {
        let mut data = SessionData::new();
        data.unset("ns", "a");
        data.set("ns", "a", 2);

        let compiled = data.compile();
        assert_eq!(compiled.to_set.get_i32("data.ns.a").unwrap(), 2);
        assert!(!compiled.to_unset.contains_key("data.ns.a"));
    }

    #[test]
    fn direct_namespaces_write_whole_value() {
        let mut data = SessionData::new();
        data.insert_direct("_flash", doc! { "notice": "saved" });

        let compiled = data.compile();
        assert_eq!(
            compiled
                .to_set
                .get_document("data._flash")
                .unwrap()
                .get_str("notice")
                .unwrap(),
            "saved"
        );
    }

    #[test]
    fn empty_log_renders_empty_update() {
        let data = SessionData::new();
        assert!(data.is_empty());

        let update = data.compile().into_document();
        assert!(update.is_empty());
    }

    #[test]
    fn into_document_omits_empty_operator_maps() {
        let mut data = SessionData::new();
        data.unset("ns", "stale");

        let update = data.compile().into_document();
        assert!(!update.contains_key("$set"));
        assert_eq!(
            update
                .get_document("$unset")
                .unwrap()
                .get_i32("data.ns.stale")
                .unwrap(),
            1
        );
    }

    #[test]
    fn parses_wire_format() {
        let wire = doc! {
            "_csrf": "token123",
            "cart": {
                "__operations": [
                    { "type": "set", "key": "items", "value": 3 },
                    { "type": "unset", "key": "coupon" },
                ],
            },
            "not_a_namespace": "ignored",
            "also_ignored": { "nested": true },
        };

        let compiled = SessionData::from_document(&wire).compile();
        assert_eq!(compiled.to_set.get_str("data._csrf").unwrap(), "token123");
        assert_eq!(compiled.to_set.get_i32("data.cart.items").unwrap(), 3);
        assert_eq!(compiled.to_unset.get_i32("data.cart.coupon").unwrap(), 1);
        assert!(!compiled.to_set.iter().any(|(k, _)| k.contains("ignored")));
    }

    #[test]
    fn wire_format_skips_malformed_operations() {
        let wire = doc! {
            "ns": {
                "__operations": [
                    { "type": "set", "value": 1 },          // missing key
                    { "type": "increment", "key": "a" },    // unknown type
                    { "type": "set", "key": "b", "value": 2 },
                ],
            },
        };

        let compiled = SessionData::from_document(&wire).compile();
        assert_eq!(compiled.to_set.len(), 1);
        assert_eq!(compiled.to_set.get_i32("data.ns.b").unwrap(), 2);
    }

    #[test]
    fn operations_replace_direct_value_for_same_namespace() {
        let mut data = SessionData::new();
        data.insert_direct("ns", "raw");
        data.set("ns", "a", 1);

        let compiled = data.compile();
        assert!(!compiled.to_set.contains_key("data.ns"));
        assert_eq!(compiled.to_set.get_i32("data.ns.a").unwrap(), 1);
    }
}
