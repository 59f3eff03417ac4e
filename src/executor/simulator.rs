use chrono::{DateTime, SecondsFormat, Utc};

use crate::planner::plan::{ExecutionPlan, PlanAction, PlanRow};
use crate::registry::models::ExecutionMode;

use super::audit::{AuditRow, AuditStatus};

/// Decide a row's terminal status.
///
/// NO_OP is always skipped. Anything else is skipped under dry_run and
/// succeeds otherwise.
pub fn decide_status(action: PlanAction, execution_mode: ExecutionMode) -> AuditStatus {
    match (action, execution_mode) {
        (PlanAction::NoOp, _) => AuditStatus::Skipped,
        (_, ExecutionMode::DryRun) => AuditStatus::Skipped,
        _ => AuditStatus::Success,
    }
}

/// Simulate the plan under a fresh run id and the current time.
///
/// Nothing external is called. The returned audit lives only in memory.
pub fn simulate(plan: &ExecutionPlan) -> Vec<AuditRow> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    simulate_with(&plan.rows, plan.execution_mode, &execution_id, Utc::now())
}

/// Deterministic core of [`simulate`].
///
/// Rows without their own execution mode (relationship rows) inherit
/// `environment_mode`.
pub fn simulate_with(
    rows: &[PlanRow],
    environment_mode: ExecutionMode,
    execution_id: &str,
    at: DateTime<Utc>,
) -> Vec<AuditRow> {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let audit: Vec<AuditRow> = rows
        .iter()
        .map(|row| {
            let mode = row.execution_mode().unwrap_or(environment_mode);
            let (resource_type, resource_name) = row.subject();
            AuditRow {
                execution_id: execution_id.to_string(),
                resource_type,
                resource_name,
                action: row.action().to_string(),
                status: decide_status(row.action(), mode),
                timestamp: timestamp.clone(),
            }
        })
        .collect();

    tracing::info!(
        execution_id = %execution_id,
        rows = audit.len(),
        succeeded = audit.iter().filter(|a| a.status == AuditStatus::Success).count(),
        "Simulated execution"
    );
    audit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        use AuditStatus::*;
        use ExecutionMode::*;
        assert_eq!(decide_status(PlanAction::NoOp, Apply), Skipped);
        assert_eq!(decide_status(PlanAction::NoOp, DryRun), Skipped);
        assert_eq!(decide_status(PlanAction::Create, DryRun), Skipped);
        assert_eq!(decide_status(PlanAction::Create, Apply), Success);
        assert_eq!(decide_status(PlanAction::AddRelationship, Apply), Success);
        assert_eq!(decide_status(PlanAction::CreateResource, DryRun), Skipped);
    }
}
