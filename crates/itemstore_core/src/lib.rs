//! Core data-access logic for the item collection store.
//! This crate is the single source of truth for collection invariants;
//! UI, rendering and event wiring live in surrounding application code.

pub mod db;
pub mod logging;
pub mod medium;
pub mod model;
pub mod store;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use medium::{MediumError, MediumResult, MemoryMedium, SqliteMedium, StorageMedium};
pub use model::item::{Collection, FieldMap, Item, ItemId, ID_FIELD};
pub use store::item_store::{Saved, Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
