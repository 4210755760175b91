//! Domain model for the item collection store.
//!
//! # Responsibility
//! - Define the canonical item and collection shapes shared by every layer.
//! - Keep query matching and merge rules in one place.
//!
//! # Invariants
//! - Every item is identified by an integer `ItemId`.
//! - Collection order is insertion order and is semantically meaningful.

pub mod item;
