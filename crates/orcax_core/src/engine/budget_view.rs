//! Dashboard-level metrics derived from a `FinancialSummary`.
//!
//! # Responsibility
//! - Project the summary onto an annual or single-month period.
//! - List capacity conflicts per member for conflict highlighting.

use crate::engine::financials::FinancialSummary;
use crate::model::member::{MemberId, TeamMember};
use crate::model::month::{Month, MONTHS_PER_YEAR};
use crate::model::project::Project;

/// Period a budget view is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Annual,
    Month(Month),
}

/// Budget figures for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetView {
    pub period: Period,
    /// All projects for the annual view, projects active in the month otherwise.
    pub active_projects: usize,
    pub current_cost: f64,
    pub budget_limit: f64,
    /// `current_cost / budget_limit * 100`, 0 when the limit is 0.
    pub usage_pct: f64,
    /// Annual budget minus annual projected cost, regardless of period.
    pub budget_remaining: f64,
}

impl BudgetView {
    pub fn for_period(
        summary: &FinancialSummary,
        projects: &[Project],
        annual_budget: f64,
        period: Period,
    ) -> Self {
        let (active_projects, current_cost, budget_limit) = match period {
            Period::Annual => (
                projects.len(),
                summary.total_projected_cost,
                annual_budget,
            ),
            Period::Month(month) => (
                projects.iter().filter(|p| p.is_active_in(month)).count(),
                summary.month(month).total_cost,
                annual_budget / MONTHS_PER_YEAR as f64,
            ),
        };
        let usage_pct = if budget_limit > 0.0 {
            current_cost / budget_limit * 100.0
        } else {
            0.0
        };

        Self {
            period,
            active_projects,
            current_cost,
            budget_limit,
            usage_pct,
            budget_remaining: annual_budget - summary.total_projected_cost,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.current_cost > self.budget_limit
    }
}

/// Overloaded months of one member.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadEntry {
    pub member_id: MemberId,
    pub member_name: String,
    /// Month and combined allocation percentage, calendar order.
    pub months: Vec<(Month, f64)>,
}

/// Capacity conflicts across the whole team.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverloadReport {
    /// One entry per overloaded member, in team order.
    pub entries: Vec<OverloadEntry>,
}

impl OverloadReport {
    pub fn has_conflicts(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Collects members whose combined allocation exceeds 100% in any month.
pub fn overload_report(summary: &FinancialSummary, team: &[TeamMember]) -> OverloadReport {
    let entries = team
        .iter()
        .filter_map(|member| {
            let months = summary.overloaded_months(&member.id);
            (!months.is_empty()).then(|| OverloadEntry {
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                months,
            })
        })
        .collect();
    OverloadReport { entries }
}
