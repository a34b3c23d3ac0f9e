//! Allocation/financial engine.
//!
//! # Responsibility
//! - Turn `(projects, team, annual_budget)` into monthly flows, project
//!   rankings, and per-member overload vectors.
//! - Provide period views and conflict reports on top of those aggregates.
//!
//! # Invariants
//! - Pure: results are recomputed in full from the inputs and never written
//!   back to the entity store.

pub mod budget_view;
pub mod financials;
