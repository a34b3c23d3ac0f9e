//! Allocation and cost aggregation.
//!
//! # Responsibility
//! - Derive monthly cost flows, per-project totals, and per-member allocation
//!   sums from the raw entity collections.
//!
//! # Invariants
//! - `compute` is referentially transparent: no I/O, no hidden state.
//! - Dangling member ids and empty collections contribute zero; nothing fails.
//! - No rounding or clamping is applied; raw sums are preserved.
//! - `total_projected_cost` equals the sum of all project costs.

use crate::model::member::{MemberId, TeamMember};
use crate::model::month::{Month, MONTHS_PER_YEAR};
use crate::model::project::{Project, ProjectId};
use std::collections::{BTreeMap, HashMap};

/// Combined allocation above this percentage marks an overloaded month.
pub const OVERLOAD_THRESHOLD_PCT: f64 = 100.0;

/// Aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyFlow {
    pub month: Month,
    /// Cost across all projects active in this month.
    pub total_cost: f64,
    /// Linear budget share, `annual_budget / 12`.
    pub budget_limit: f64,
    /// Cost per project active in this month.
    pub project_breakdown: BTreeMap<ProjectId, f64>,
    /// Summed allocation percentage per current team member.
    pub member_allocations: BTreeMap<MemberId, f64>,
}

/// Annual cost of one project and its share of the projected total.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCost {
    pub id: ProjectId,
    pub name: String,
    pub cost: f64,
    /// Share of `total_projected_cost` in percent; 0 when the total is 0.
    pub percentage: f64,
}

/// Everything derived from one entity snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    /// Exactly twelve entries, January first.
    pub monthly: Vec<MonthlyFlow>,
    /// Sorted by cost, highest first; ties keep project order.
    pub project_costs: Vec<ProjectCost>,
    pub total_projected_cost: f64,
    /// Member id -> allocation sum per month (index 0 = January).
    pub monthly_overload: BTreeMap<MemberId, [f64; MONTHS_PER_YEAR]>,
}

impl FinancialSummary {
    pub fn month(&self, month: Month) -> &MonthlyFlow {
        &self.monthly[month.index()]
    }

    pub fn project_cost(&self, id: ProjectId) -> Option<&ProjectCost> {
        self.project_costs.iter().find(|cost| cost.id == id)
    }

    /// Months in which the member's combined allocation exceeds 100%.
    pub fn overloaded_months(&self, member_id: &str) -> Vec<(Month, f64)> {
        let Some(sums) = self.monthly_overload.get(member_id) else {
            return vec![];
        };
        Month::all()
            .into_iter()
            .zip(sums.iter().copied())
            .filter(|(_, total)| *total > OVERLOAD_THRESHOLD_PCT)
            .collect()
    }

    pub fn is_overloaded(&self, member_id: &str, month: Month) -> bool {
        self.monthly_overload
            .get(member_id)
            .is_some_and(|sums| sums[month.index()] > OVERLOAD_THRESHOLD_PCT)
    }
}

/// Computes all derived aggregates for one snapshot.
pub fn compute(projects: &[Project], team: &[TeamMember], annual_budget: f64) -> FinancialSummary {
    let members: HashMap<&str, &TeamMember> =
        team.iter().map(|member| (member.id.as_str(), member)).collect();
    let budget_limit = annual_budget / MONTHS_PER_YEAR as f64;

    let monthly: Vec<MonthlyFlow> = Month::all()
        .into_iter()
        .map(|month| month_flow(month, projects, team, &members, budget_limit))
        .collect();

    let total_projected_cost: f64 = monthly.iter().map(|flow| flow.total_cost).sum();

    let mut project_costs: Vec<ProjectCost> = projects
        .iter()
        .map(|project| {
            let cost: f64 = monthly
                .iter()
                .filter_map(|flow| flow.project_breakdown.get(&project.id))
                .sum();
            ProjectCost {
                id: project.id,
                name: project.name.clone(),
                cost,
                percentage: share_pct(cost, total_projected_cost),
            }
        })
        .collect();
    // `sort_by` is stable, so equal costs keep their original order.
    project_costs.sort_by(|a, b| b.cost.total_cmp(&a.cost));

    let monthly_overload = team
        .iter()
        .map(|member| {
            let mut sums = [0.0; MONTHS_PER_YEAR];
            for (slot, flow) in sums.iter_mut().zip(&monthly) {
                *slot = flow
                    .member_allocations
                    .get(&member.id)
                    .copied()
                    .unwrap_or(0.0);
            }
            (member.id.clone(), sums)
        })
        .collect();

    FinancialSummary {
        monthly,
        project_costs,
        total_projected_cost,
        monthly_overload,
    }
}

fn month_flow(
    month: Month,
    projects: &[Project],
    team: &[TeamMember],
    members: &HashMap<&str, &TeamMember>,
    budget_limit: f64,
) -> MonthlyFlow {
    let mut member_allocations: BTreeMap<MemberId, f64> =
        team.iter().map(|member| (member.id.clone(), 0.0)).collect();
    let mut project_breakdown = BTreeMap::new();
    let mut total_cost = 0.0;

    for project in projects.iter().filter(|p| p.is_active_in(month)) {
        let mut project_cost = 0.0;
        for member_id in &project.team_ids {
            let Some(member) = members.get(member_id.as_str()) else {
                continue;
            };
            let pct = project.allocation_for(member_id);
            project_cost += member.cost_in(month) * (pct / 100.0);
            if let Some(sum) = member_allocations.get_mut(member_id) {
                *sum += pct;
            }
        }
        *project_breakdown.entry(project.id).or_insert(0.0) += project_cost;
        total_cost += project_cost;
    }

    MonthlyFlow {
        month,
        total_cost,
        budget_limit,
        project_breakdown,
        member_allocations,
    }
}

fn share_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
