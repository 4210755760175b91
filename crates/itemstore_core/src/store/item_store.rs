//! Item collection store.
//!
//! # Responsibility
//! - Load or initialize a named collection from the durable medium.
//! - Serve exact-match queries from the in-memory cache.
//! - Apply insert/update/remove/clear mutations and synchronize
//!   cache -> medium after every one of them.
//!
//! # Invariants
//! - The medium is read exactly once, at open; afterwards the cache is the
//!   single source of truth for this instance.
//! - Generated ids are unique within the collection at generation time.
//! - Collection order is insertion order; updates keep an item's position.

use crate::medium::{MediumError, StorageMedium};
use crate::model::item::{Collection, FieldMap, Item, ItemId, ID_FIELD};
use log::{debug, error, info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ID_DIGITS: u32 = 6;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for load and persistence operations.
///
/// Not-found update/remove targets are deliberately not errors; those calls
/// succeed as no-ops per the collection contract.
#[derive(Debug)]
pub enum StoreError {
    Medium(MediumError),
    /// The stored payload for a collection could not be parsed. Fatal at
    /// load time; no partial recovery is attempted.
    Corrupt {
        name: String,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium(err) => write!(f, "{err}"),
            Self::Corrupt { name, source } => {
                write!(f, "corrupt payload for collection `{name}`: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Medium(err) => Some(err),
            Self::Corrupt { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(value: MediumError) -> Self {
        Self::Medium(value)
    }
}

/// Outcome of a [`Store::save`] call.
///
/// Insert and update intentionally report different shapes: an insert hands
/// back only the created item, an update hands back the full sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    /// Insert mode: the newly created item with its generated id.
    Created(Item),
    /// Update mode: the full (possibly unchanged) item sequence.
    Updated(Vec<Item>),
}

/// Cache-backed store for one named collection.
///
/// Single-threaded and synchronous: every operation finishes its cache
/// mutation and durable write before returning. The store exclusively owns
/// its medium handle; two stores opened on the same name through separate
/// handles will diverge (last writer wins).
pub struct Store<M: StorageMedium> {
    name: String,
    medium: M,
    cache: Collection,
}

impl<M: StorageMedium> Store<M> {
    /// Opens the named collection, initializing an empty one if the medium
    /// has no entry for `name`.
    ///
    /// # Errors
    /// - `StoreError::Corrupt` when an existing payload cannot be parsed.
    /// - Medium errors from the initial read or the initial-value write.
    pub fn open(name: impl Into<String>, mut medium: M) -> StoreResult<Self> {
        let name = name.into();
        let started_at = Instant::now();
        info!("event=store_open module=store status=start name={name}");

        let cache = match medium.get(&name)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                error!(
                    "event=store_open module=store status=error name={name} error_code=corrupt_payload error={source}"
                );
                StoreError::Corrupt {
                    name: name.clone(),
                    source,
                }
            })?,
            None => {
                let empty = Collection::default();
                medium.set(&name, &encode(&empty)?)?;
                empty
            }
        };

        info!(
            "event=store_open module=store status=ok name={name} items={} duration_ms={}",
            cache.items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            name,
            medium,
            cache,
        })
    }

    /// Returns the collection name this store was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consumes the store, handing back the underlying medium.
    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Returns the items matching every field of `query`, in cache order.
    ///
    /// Equality is strict; an empty query returns everything.
    pub fn find(&self, query: &FieldMap) -> Vec<Item> {
        self.cache
            .items
            .iter()
            .filter(|item| item.matches(query))
            .cloned()
            .collect()
    }

    /// Returns the entire cached sequence in cache order.
    pub fn find_all(&self) -> &[Item] {
        &self.cache.items
    }

    /// Inserts or updates an item, then persists the full collection.
    ///
    /// Update mode (`Some(id)`): shallow-merges `fields` into the first item
    /// with that id. A missing target is a silent no-op. Later items sharing
    /// the id are left untouched. Returns `Saved::Updated` with the full
    /// sequence.
    ///
    /// Insert mode (`None`): assigns a fresh random 6-digit id, appends the
    /// new item, and returns `Saved::Created` with only that item.
    pub fn save(&mut self, fields: FieldMap, id: Option<ItemId>) -> StoreResult<Saved> {
        let saved = match id {
            Some(id) => {
                if matches!(fields.get(ID_FIELD), Some(value) if value.as_i64().is_none()) {
                    warn!(
                        "event=store_save module=store status=ok name={} mode=update id={id} note=non_integer_id_patch_ignored",
                        self.name
                    );
                }
                match self.cache.items.iter_mut().find(|item| item.id == id) {
                    Some(item) => item.merge(&fields),
                    None => debug!(
                        "event=store_save module=store status=ok name={} mode=update id={id} outcome=not_found",
                        self.name
                    ),
                }
                Saved::Updated(self.cache.items.clone())
            }
            None => {
                let item = Item::new(self.generate_id(), fields);
                self.cache.items.push(item.clone());
                Saved::Created(item)
            }
        };

        self.persist()?;
        debug!(
            "event=store_save module=store status=ok name={} mode={} items={}",
            self.name,
            match saved {
                Saved::Created(_) => "insert",
                Saved::Updated(_) => "update",
            },
            self.cache.items.len()
        );
        Ok(saved)
    }

    /// Removes every item whose id equals `id`, persists, and returns the
    /// remaining sequence.
    ///
    /// Removing all matches (not just the first) doubles as a cleanup path
    /// for pre-existing duplicate ids. A missing target is a silent no-op.
    pub fn remove(&mut self, id: ItemId) -> StoreResult<Vec<Item>> {
        let before = self.cache.items.len();
        self.cache.items.retain(|item| item.id != id);
        let removed = before - self.cache.items.len();

        self.persist()?;
        debug!(
            "event=store_remove module=store status=ok name={} id={id} removed={removed} items={}",
            self.name,
            self.cache.items.len()
        );
        Ok(self.cache.items.clone())
    }

    /// Replaces the collection with an empty one, persists it, and returns
    /// the (empty) sequence.
    pub fn clear(&mut self) -> StoreResult<Vec<Item>> {
        self.cache = Collection::default();
        self.persist()?;
        info!(
            "event=store_clear module=store status=ok name={}",
            self.name
        );
        Ok(Vec::new())
    }

    /// Draws 6 random decimal digits (leading zeros allowed) and folds them
    /// into an integer, retrying until the value differs from every existing
    /// id.
    ///
    /// The retry loop scans the whole collection per attempt, which is
    /// acceptable for the small collections this store targets.
    fn generate_id(&self) -> ItemId {
        let mut rng = rand::thread_rng();
        loop {
            let mut candidate: ItemId = 0;
            for _ in 0..ID_DIGITS {
                candidate = candidate * 10 + ItemId::from(rng.gen_range(0..10u8));
            }
            if !self.cache.items.iter().any(|item| item.id == candidate) {
                return candidate;
            }
        }
    }

    fn persist(&mut self) -> StoreResult<()> {
        let encoded = encode(&self.cache)?;
        self.medium.set(&self.name, &encoded)?;
        Ok(())
    }
}

fn encode(collection: &Collection) -> StoreResult<String> {
    serde_json::to_string(collection).map_err(StoreError::Encode)
}
