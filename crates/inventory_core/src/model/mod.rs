//! Inventory domain model.
//!
//! # Responsibility
//! - Define the canonical record used by storage and the dashboard.
//!
//! # Invariants
//! - Every persisted item is identified by a storage-generated `ItemId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
