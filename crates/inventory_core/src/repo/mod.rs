//! Data-access layer.
//!
//! # Responsibility
//! - Define the item storage contract used by the dashboard.
//! - Isolate SQLite statements and connection handling from callers.
//!
//! # Invariants
//! - Store APIs distinguish `NotFound` from storage failures.
//! - Storage failures are logged at the boundary and then returned.

pub mod item_repo;
