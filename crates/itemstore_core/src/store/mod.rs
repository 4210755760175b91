//! Store layer: cache-backed collection access over a durable medium.
//!
//! # Responsibility
//! - Orchestrate cache reads, cache mutations and durable writes.
//! - Keep persistence details behind the `StorageMedium` seam.
//!
//! # Invariants
//! - The cache is authoritative for reads after the initial load.
//! - Every mutation re-serializes the full collection before returning.

pub mod item_store;
