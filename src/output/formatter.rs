use colored::Colorize;

use crate::cost::kpi::Kpi;
use crate::executor::audit::{AuditRow, AuditStatus};
use crate::planner::plan::{ExecutionPlan, PlanAction, PlanRow};
use crate::registry::models::ExecutionMode;

use super::report::Report;

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print the notice shown in place of an empty table.
pub fn print_no_data(what: &str) {
    println!("{}", format!("No data: {}.", what).dimmed());
}

/// Print a section heading.
pub fn print_heading(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(60));
}

fn action_icon(action: PlanAction) -> colored::ColoredString {
    match action {
        PlanAction::Create => "+".green().bold(),
        PlanAction::CreateResource => "*".yellow().bold(),
        PlanAction::AddRelationship => "~".cyan().bold(),
        PlanAction::NoOp => "=".dimmed(),
    }
}

/// Print a merged plan, one line per row in execution order.
pub fn print_plan(plan: &ExecutionPlan) {
    println!();
    let mode = match plan.execution_mode {
        ExecutionMode::DryRun => plan.execution_mode.to_string().yellow(),
        ExecutionMode::Apply => plan.execution_mode.to_string().green(),
    };
    println!(
        "Execution plan for environment {} ({})",
        plan.environment.bold(),
        mode
    );

    if plan.rows.is_empty() {
        print_no_data("no active resources or relationships are declared");
        return;
    }

    println!("Actions are indicated with the following symbols:");
    for (action, label) in [
        (PlanAction::Create, "create resource"),
        (PlanAction::CreateResource, "create missing relationship endpoint"),
        (PlanAction::AddRelationship, "add relationship"),
        (PlanAction::NoOp, "no changes"),
    ] {
        if plan.count(action) > 0 {
            println!("  {} {}", action_icon(action), label);
        }
    }
    println!();

    for row in &plan.rows {
        print_plan_row(row);
    }

    println!();
    if plan.is_converged() {
        println!("{}", plan.to_string().green());
    } else {
        println!("{}", plan);
    }
}

fn print_plan_row(row: &PlanRow) {
    let priority = format!("[{:>3}]", row.priority()).dimmed();
    let icon = action_icon(row.action());
    match row {
        PlanRow::Resource(r) => {
            let desc = match r.action {
                PlanAction::NoOp => "exists".dimmed(),
                _ => "will be created".dimmed(),
            };
            println!(
                "  {} {} {}.{} {}",
                priority,
                icon,
                r.resource_type,
                r.resource_name.bold(),
                desc
            );
        }
        PlanRow::Relationship(r) => {
            let edge = format!("{} {} -> {}", r.relationship_type, r.source, r.target);
            match &r.missing {
                Some(missing) => println!(
                    "  {} {} {} ({}) {} {}",
                    priority,
                    icon,
                    missing.to_string().bold(),
                    r.details.yellow(),
                    "required by".dimmed(),
                    edge
                ),
                None => println!(
                    "  {} {} {} {}",
                    priority,
                    icon,
                    edge.bold(),
                    r.details.dimmed()
                ),
            }
        }
    }
}

/// Print an audit table with colored statuses.
pub fn print_audit(audit: &[AuditRow]) {
    if audit.is_empty() {
        print_no_data("the plan produced no audit rows");
        return;
    }

    print_heading("Execution Audit");
    println!(
        "  {:<16} {:<40} {:<18} {}",
        "TYPE".bold(),
        "NAME".bold(),
        "ACTION".bold(),
        "STATUS".bold()
    );
    for row in audit {
        let status = match row.status {
            AuditStatus::Success => row.status.to_string().green(),
            AuditStatus::Skipped => row.status.to_string().dimmed(),
        };
        println!(
            "  {:<16} {:<40} {:<18} {}",
            row.resource_type, row.resource_name, row.action, status
        );
    }
    println!("{}", "─".repeat(60));
}

/// Print the run summary line.
pub fn print_report(report: &Report) {
    println!();
    if report.succeeded > 0 {
        println!("{}", report.to_string().green());
    } else {
        println!("{}", report);
    }
}

/// Print dashboard KPI cards, one per line.
pub fn print_kpis(kpis: &[Kpi]) {
    print_heading("Cost Governance KPIs");
    let width = kpis.iter().map(|k| k.title.len()).max().unwrap_or(0);
    for kpi in kpis {
        println!(
            "  {:<width$}  {}  {}",
            kpi.title.bold(),
            kpi.value.to_string().green().bold(),
            kpi.note.dimmed(),
            width = width
        );
    }
    println!();
}
