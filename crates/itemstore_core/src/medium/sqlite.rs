//! SQLite-backed durable medium.
//!
//! # Responsibility
//! - Persist collection payloads in the `collections` key-value table.
//! - Keep SQL details inside the medium boundary.
//!
//! # Invariants
//! - The wrapped connection is bootstrapped and migrated before use.

use super::{MediumResult, StorageMedium};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable medium persisting each collection as one row in SQLite.
pub struct SqliteMedium {
    conn: Connection,
}

impl SqliteMedium {
    /// Opens a file-backed medium, creating and migrating the database as
    /// needed.
    pub fn open(path: impl AsRef<Path>) -> MediumResult<Self> {
        Ok(Self { conn: open_db(path)? })
    }

    /// Opens an in-memory medium. Useful for tests that want real SQL
    /// behavior without a file.
    pub fn open_in_memory() -> MediumResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl StorageMedium for SqliteMedium {
    fn get(&self, key: &str) -> MediumResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn set(&mut self, key: &str, value: &str) -> MediumResult<()> {
        self.conn.execute(
            "INSERT INTO collections (name, payload) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
