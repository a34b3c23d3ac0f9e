//! Persistence synchronization.
//!
//! # Responsibility
//! - Load the startup snapshot through an ordered provider cascade.
//! - Debounce entity mutations into full-snapshot dual writes.
//! - Track persistence provenance (`cloud|local|offline`) and save status.
//!
//! # Invariants
//! - All entity reads and writes happen on one logical thread; the
//!   coordinator is borrowed mutably by its driver and never shared.

pub mod clock;
pub mod coordinator;
pub mod debounce;
pub mod provider;
pub mod remote;
pub mod status;
