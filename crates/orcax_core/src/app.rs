//! Application controller.
//!
//! # Responsibility
//! - Own the entity store, the persistence coordinator, and the budget.
//! - Route every mutation through the store and notify the coordinator.
//! - Recompute engine aggregates on demand from the current store.
//!
//! # Invariants
//! - The snapshot is loaded before any mutation is accepted.
//! - Only successful mutations schedule a save.

use crate::config::AppConfig;
use crate::engine::budget_view::{overload_report, BudgetView, OverloadReport, Period};
use crate::engine::financials::{compute, FinancialSummary};
use crate::model::member::MemberId;
use crate::model::project::ProjectId;
use crate::repo::snapshot_cache::LocalCache;
use crate::store::entity_store::{EntityStore, MemberField, ProjectField, StoreResult};
use crate::sync::clock::{Clock, SystemClock};
use crate::sync::coordinator::{PersistenceCoordinator, SaveReport};
use crate::sync::provider::LoadOutcome;
use crate::sync::remote::RemoteStore;
use crate::sync::status::{PersistenceMode, SaveStatus};
use std::time::Duration;

/// Top-level context object shared by presentation collaborators.
pub struct BudgetApp<R: RemoteStore, C: LocalCache> {
    store: EntityStore,
    coordinator: PersistenceCoordinator<R, C>,
    annual_budget: f64,
    clock: Box<dyn Clock>,
}

impl<R: RemoteStore, C: LocalCache> BudgetApp<R, C> {
    /// Loads the startup snapshot and returns a ready application.
    pub fn start(remote: R, cache: C, config: &AppConfig) -> (Self, LoadOutcome) {
        Self::start_with_clock(remote, cache, config, Box::new(SystemClock))
    }

    pub fn start_with_clock(
        remote: R,
        cache: C,
        config: &AppConfig,
        clock: Box<dyn Clock>,
    ) -> (Self, LoadOutcome) {
        let mut coordinator =
            PersistenceCoordinator::new(remote, cache, config.cache_key.clone(), config.debounce);
        let outcome = coordinator.load();
        let app = Self {
            store: EntityStore::from_snapshot(outcome.snapshot.clone()),
            coordinator,
            annual_budget: config.annual_budget,
            clock,
        };
        (app, outcome)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator<R, C> {
        &self.coordinator
    }

    pub fn annual_budget(&self) -> f64 {
        self.annual_budget
    }

    pub fn mode(&self) -> PersistenceMode {
        self.coordinator.mode()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.coordinator.status()
    }

    /// Full engine recompute over the current entities.
    pub fn summary(&self) -> FinancialSummary {
        compute(self.store.projects(), self.store.team(), self.annual_budget)
    }

    pub fn budget_view(&self, period: Period) -> BudgetView {
        BudgetView::for_period(
            &self.summary(),
            self.store.projects(),
            self.annual_budget,
            period,
        )
    }

    pub fn overloads(&self) -> OverloadReport {
        overload_report(&self.summary(), self.store.team())
    }

    /// Runs a due save cycle, if the quiet period has elapsed.
    pub fn tick(&mut self) -> Option<SaveReport> {
        let now = self.clock.now();
        self.coordinator.poll(&self.store, now)
    }

    /// Time left until the pending save fires.
    pub fn time_until_save(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.coordinator
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Writes any pending edits immediately.
    pub fn flush(&mut self) -> Option<SaveReport> {
        self.coordinator.flush(&self.store)
    }

    /// Persists the current state even when nothing was edited.
    pub fn save_now(&mut self) -> Option<SaveReport> {
        let now = self.clock.now();
        self.coordinator.save_now(&self.store, now)
    }

    pub fn add_project(&mut self) -> ProjectId {
        let id = self.store.add_project();
        self.mutated();
        id
    }

    pub fn remove_project(&mut self, id: ProjectId) -> StoreResult<()> {
        self.store.remove_project(id)?;
        self.mutated();
        Ok(())
    }

    pub fn update_project_field(&mut self, id: ProjectId, field: ProjectField) -> StoreResult<()> {
        self.store.update_project_field(id, field)?;
        self.mutated();
        Ok(())
    }

    pub fn toggle_membership(&mut self, project_id: ProjectId, member_id: &str) -> StoreResult<bool> {
        let assigned = self.store.toggle_membership(project_id, member_id)?;
        self.mutated();
        Ok(assigned)
    }

    pub fn update_allocation(
        &mut self,
        project_id: ProjectId,
        member_id: &str,
        pct: f64,
    ) -> StoreResult<()> {
        self.store.update_allocation(project_id, member_id, pct)?;
        self.mutated();
        Ok(())
    }

    pub fn add_member(&mut self) -> MemberId {
        let id = self.store.add_member();
        self.mutated();
        id
    }

    pub fn remove_member(&mut self, id: &str) -> StoreResult<()> {
        self.store.remove_member(id)?;
        self.mutated();
        Ok(())
    }

    pub fn update_member_field(&mut self, id: &str, field: MemberField) -> StoreResult<()> {
        self.store.update_member_field(id, field)?;
        self.mutated();
        Ok(())
    }

    pub fn update_member_cost(&mut self, id: &str, month_index: usize, value: f64) -> StoreResult<()> {
        self.store.update_member_cost(id, month_index, value)?;
        self.mutated();
        Ok(())
    }

    fn mutated(&mut self) {
        let now = self.clock.now();
        self.coordinator.notify_mutation(now);
    }
}
