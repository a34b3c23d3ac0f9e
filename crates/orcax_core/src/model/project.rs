//! Project domain model.
//!
//! # Responsibility
//! - Define a time-boxed project with its assigned team and allocations.
//! - Answer calendar questions (is the project active in a month).
//!
//! # Invariants
//! - Active range is the closed interval `[start_month, start_month + duration_months - 1]`.
//! - Months past December are never matched; a project running past the year
//!   end is truncated at December.
//! - `allocations` keys are a subset of `team_ids` after any store mutation.
//! - Persisted `null` numbers (blank inputs) decode as `0`: a `null` duration
//!   is never active and a `null` allocation costs nothing.

use crate::model::member::MemberId;
use crate::model::month::Month;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Monotonically assigned project identifier.
pub type ProjectId = u32;

/// Time-boxed project with per-member flat dedication percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub objective: String,
    /// 1-based calendar month (1 = January).
    #[serde(deserialize_with = "null_as_zero")]
    pub start_month: u32,
    /// Number of months the project runs; at least 1.
    #[serde(deserialize_with = "null_as_zero")]
    pub duration_months: u32,
    /// Assigned members in display order.
    #[serde(default)]
    pub team_ids: Vec<MemberId>,
    /// Member id -> percentage of capacity, nominally 0..=100.
    #[serde(default, deserialize_with = "null_allocations_as_zero")]
    pub allocations: BTreeMap<MemberId, f64>,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            objective: objective.into(),
            start_month: 1,
            duration_months: 6,
            team_ids: Vec::new(),
            allocations: BTreeMap::new(),
        }
    }

    /// Sets the calendar window.
    pub fn with_schedule(mut self, start_month: u32, duration_months: u32) -> Self {
        self.start_month = start_month;
        self.duration_months = duration_months;
        self
    }

    /// Assigns a member with the given allocation, keeping `team_ids` unique.
    pub fn with_member(mut self, member_id: impl Into<MemberId>, pct: f64) -> Self {
        let member_id = member_id.into();
        if !self.has_member(&member_id) {
            self.team_ids.push(member_id.clone());
        }
        self.allocations.insert(member_id, pct);
        self
    }

    /// Assigns a member without an explicit allocation entry.
    pub fn with_unallocated_member(mut self, member_id: impl Into<MemberId>) -> Self {
        let member_id = member_id.into();
        if !self.has_member(&member_id) {
            self.team_ids.push(member_id);
        }
        self
    }

    /// Last calendar month number covered, which may exceed 12.
    pub fn end_month(&self) -> u32 {
        self.start_month
            .saturating_add(self.duration_months)
            .saturating_sub(1)
    }

    pub fn is_active_in(&self, month: Month) -> bool {
        let number = month.number();
        self.duration_months > 0 && number >= self.start_month && number <= self.end_month()
    }

    /// Months of the fixed year in which the project is active.
    pub fn active_months(&self) -> impl Iterator<Item = Month> + '_ {
        Month::all()
            .into_iter()
            .filter(move |month| self.is_active_in(*month))
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.team_ids.iter().any(|id| id == member_id)
    }

    /// Allocation percentage for a member, `0.0` when absent.
    pub fn allocation_for(&self, member_id: &str) -> f64 {
        self.allocations.get(member_id).copied().unwrap_or(0.0)
    }

    /// Drops a member from the team together with its allocation entry.
    ///
    /// Returns whether the member was assigned.
    pub(crate) fn detach_member(&mut self, member_id: &str) -> bool {
        let before = self.team_ids.len();
        self.team_ids.retain(|id| id != member_id);
        let had_allocation = self.allocations.remove(member_id).is_some();
        before != self.team_ids.len() || had_allocation
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_allocations_as_zero<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<MemberId, f64>, D::Error> {
    let raw = Option::<BTreeMap<MemberId, Option<f64>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(member_id, pct)| (member_id, pct.unwrap_or(0.0)))
        .collect())
}
