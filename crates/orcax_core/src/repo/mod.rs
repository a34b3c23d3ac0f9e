//! Local persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the keyed cache contract used by the persistence coordinator.
//! - Isolate SQLite query details from the coordinator.

pub mod snapshot_cache;
