//! Command handlers. Output is plain text on stdout; diagnostics go to stderr.

use crate::error::CliResult;
use orcax_core::{BudgetApp, LocalCache, Month, Period, RemoteStore, SaveStatus};
use std::process::ExitCode;

pub fn report<R: RemoteStore, C: LocalCache>(
    app: &BudgetApp<R, C>,
    month: Option<u32>,
) -> CliResult<ExitCode> {
    let summary = app.summary();

    println!("{:<10} {:>14} {:>14}", "month", "cost", "limit");
    for flow in &summary.monthly {
        let marker = if flow.total_cost > flow.budget_limit { " !" } else { "" };
        println!(
            "{:<10} {:>14.2} {:>14.2}{}",
            flow.month.short_name(),
            flow.total_cost,
            flow.budget_limit,
            marker
        );
    }

    println!();
    println!("{:>4} {:<32} {:>14} {:>8}", "id", "project", "cost", "share");
    for cost in &summary.project_costs {
        println!(
            "{:>4} {:<32} {:>14.2} {:>7.1}%",
            cost.id, cost.name, cost.cost, cost.percentage
        );
    }

    let period = month
        .and_then(Month::from_number)
        .map(Period::Month)
        .unwrap_or_default();
    let view = app.budget_view(period);
    let label = match view.period {
        Period::Annual => "annual".to_string(),
        Period::Month(month) => month.name().to_ascii_lowercase(),
    };

    println!();
    println!("period:           {label}");
    println!("active projects:  {}", view.active_projects);
    println!("cost:             {:.2}", view.current_cost);
    println!("budget limit:     {:.2}", view.budget_limit);
    println!("usage:            {:.1}%", view.usage_pct);
    println!("annual remaining: {:.2}", view.budget_remaining);

    Ok(ExitCode::SUCCESS)
}

pub fn overloads<R: RemoteStore, C: LocalCache>(app: &BudgetApp<R, C>) -> CliResult<ExitCode> {
    let report = app.overloads();
    if !report.has_conflicts() {
        println!("no allocation conflicts");
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &report.entries {
        let months = entry
            .months
            .iter()
            .map(|(month, pct)| format!("{} {:.0}%", month.short_name(), pct))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{} ({}): {}", entry.member_name, entry.member_id, months);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn export<R: RemoteStore, C: LocalCache>(app: &BudgetApp<R, C>) -> CliResult<ExitCode> {
    let json = serde_json::to_string_pretty(&app.store().snapshot())?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

pub fn sync<R: RemoteStore, C: LocalCache>(app: &mut BudgetApp<R, C>) -> CliResult<ExitCode> {
    let Some(report) = app.save_now() else {
        println!("nothing to save");
        return Ok(ExitCode::SUCCESS);
    };

    println!(
        "mode={} status={} remote_ok={} local_ok={}",
        report.mode, report.status, report.remote_ok, report.local_ok
    );
    if report.status == SaveStatus::Error {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
