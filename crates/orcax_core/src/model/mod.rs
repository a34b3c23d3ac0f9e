//! Budget domain model.
//!
//! # Responsibility
//! - Define the canonical entities edited by users: projects and team members.
//! - Define the snapshot envelope exchanged with remote and local persistence.
//!
//! # Invariants
//! - Every member carries exactly twelve monthly cost values.
//! - Every `Project::allocations` key is also present in `Project::team_ids`
//!   once the entity store has touched the project.
//! - The calendar axis is fixed to one year (January..December).

pub mod member;
pub mod month;
pub mod project;
pub mod snapshot;
