//! Core domain logic for the Orcax budget planner.
//! This crate is the single source of truth for allocation and cost invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod store;
pub mod sync;

pub use app::BudgetApp;
pub use config::{AppConfig, ConfigError};
pub use engine::budget_view::{overload_report, BudgetView, OverloadEntry, OverloadReport, Period};
pub use engine::financials::{compute, FinancialSummary, MonthlyFlow, ProjectCost};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::member::{MemberId, MonthlyCost, TeamMember};
pub use model::month::Month;
pub use model::project::{Project, ProjectId};
pub use model::snapshot::{Snapshot, SnapshotPayload};
pub use repo::snapshot_cache::{CacheError, CacheResult, LocalCache, SqliteSnapshotCache};
pub use store::entity_store::{EntityStore, MemberField, ProjectField, StoreError, StoreResult};
pub use sync::coordinator::{PersistenceCoordinator, SaveReport};
pub use sync::provider::LoadOutcome;
pub use sync::remote::{DisabledRemote, HttpRemoteStore, RemoteError, RemoteStore};
pub use sync::status::{PersistenceMode, SaveStatus};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
