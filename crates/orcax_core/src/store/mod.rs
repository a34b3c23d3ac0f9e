//! Entity store: the single mutation boundary for projects and team members.
//!
//! # Responsibility
//! - Own the canonical entity collections.
//! - Validate mutation input before any state changes.
//!
//! # Invariants
//! - Nothing outside this module mutates entities directly.
//! - Rejected input returns a structured `StoreError` instead of corrupting state.

pub mod entity_store;
