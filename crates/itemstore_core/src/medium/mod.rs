//! Durable medium abstractions and implementations.
//!
//! # Responsibility
//! - Define the string key-value contract the store persists through.
//! - Provide the production SQLite medium and an in-memory fake.
//!
//! # Invariants
//! - The medium is an injected collaborator, never process-global state.
//! - `set` fully replaces the stored value for a key (last write wins).

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::SqliteMedium;

pub type MediumResult<T> = Result<T, MediumError>;

/// Medium-layer error for durable reads and writes.
#[derive(Debug)]
pub enum MediumError {
    Db(DbError),
}

impl Display for MediumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MediumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for MediumError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MediumError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value contract backing a store's persistence.
///
/// The store treats the medium as synchronous: a returned `Ok` means the
/// value is durably recorded as far as this layer can tell.
pub trait StorageMedium {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> MediumResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> MediumResult<()>;
}

impl<M: StorageMedium + ?Sized> StorageMedium for &mut M {
    fn get(&self, key: &str) -> MediumResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> MediumResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory medium used for tests and ephemeral stores.
///
/// Never fails; contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> MediumResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> MediumResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
