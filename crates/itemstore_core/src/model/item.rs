//! Item domain model.
//!
//! # Responsibility
//! - Define the open-ended item record and its persisted collection shape.
//! - Provide exact-match query filtering and shallow-merge update helpers.
//!
//! # Invariants
//! - `id` is the only typed field; all other fields are caller-defined JSON.
//! - `fields` never contains an `"id"` key, so the flattened serialized form
//!   has exactly one `id`.
//! - Collection order is insertion order; merges never move an item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Integer identifier for every item in a collection.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Ids are normalized to this single integer type at every boundary; there
/// is no string/number interchangeability anywhere in the crate.
pub type ItemId = i64;

/// Open-ended field mapping used for item bodies, update patches and
/// query predicates alike.
pub type FieldMap = Map<String, Value>;

/// Reserved field name for the item identifier.
pub const ID_FIELD: &str = "id";

/// A single record: one required integer `id` plus arbitrary caller fields.
///
/// The field map is flattened on (de)serialization, so the persisted shape
/// is one flat JSON object: `{"id": 123, "title": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique at generation time; caller-supplied duplicates are tolerated
    /// (see the remove semantics in the store layer).
    pub id: ItemId,
    /// Caller-defined fields. Not validated or typed by the store.
    #[serde(flatten)]
    pub fields: FieldMap,
}

/// The full named set of items persisted under one durable-medium key.
///
/// Serialized as `{"items":[...]}` — the single string value the durable
/// medium stores per collection name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub items: Vec<Item>,
}

impl Item {
    /// Creates an item from an assigned id and a caller field map.
    ///
    /// Any `"id"` key inside `fields` is discarded: the typed `id` is the
    /// only identity an item carries.
    pub fn new(id: ItemId, mut fields: FieldMap) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Returns whether this item satisfies every field of `query`.
    ///
    /// Equality is strict JSON equality, no coercion. A query field absent
    /// from the item is a non-match. The `"id"` query field compares against
    /// the typed id and matches only when the query value is a JSON integer.
    /// An empty query matches everything.
    pub fn matches(&self, query: &FieldMap) -> bool {
        query.iter().all(|(field, expected)| {
            if field == ID_FIELD {
                expected.as_i64() == Some(self.id)
            } else {
                self.fields.get(field) == Some(expected)
            }
        })
    }

    /// Shallow-merges `patch` into this item.
    ///
    /// Patch fields overwrite, non-patch fields are untouched. A patch
    /// `"id"` replaces the typed id only when it is a JSON integer;
    /// non-integer id values are skipped so the identity invariant holds.
    pub fn merge(&mut self, patch: &FieldMap) {
        for (field, value) in patch {
            if field == ID_FIELD {
                if let Some(id) = value.as_i64() {
                    self.id = id;
                }
                continue;
            }
            self.fields.insert(field.clone(), value.clone());
        }
    }
}
