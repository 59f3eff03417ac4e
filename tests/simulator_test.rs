use chrono::{TimeZone, Utc};
use std::path::PathBuf;

use govplane::config::loader::DataLayout;
use govplane::config::types::Settings;
use govplane::executor::audit::AuditStatus;
use govplane::executor::simulator::{simulate, simulate_with};
use govplane::output::report::generate_report;
use govplane::planner::plan::{ExecutionPlan, PlanAction};
use govplane::registry::models::ExecutionMode;
use govplane::registry::reader::GovernanceRegistry;
use govplane::state::observed::ObservedState;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/governance")
}

fn fixture_plan(environment: &str) -> ExecutionPlan {
    let layout = DataLayout::resolve(&Settings::default(), Some(fixture_dir().as_path()));
    let registry = GovernanceRegistry::load(&layout).unwrap();
    let observed = ObservedState::load(&layout.state_file).unwrap();
    ExecutionPlan::build(&registry, environment, &observed).unwrap()
}

fn count(audit: &[govplane::executor::audit::AuditRow], status: AuditStatus) -> usize {
    audit.iter().filter(|a| a.status == status).count()
}

#[test]
fn test_fixture_plan_shape() {
    let plan = fixture_plan("prod");

    assert_eq!(plan.rows.len(), 10);
    assert_eq!(plan.count(PlanAction::Create), 3);
    assert_eq!(plan.count(PlanAction::CreateResource), 2);
    assert_eq!(plan.count(PlanAction::AddRelationship), 1);
    assert_eq!(plan.count(PlanAction::NoOp), 4);
}

#[test]
fn test_apply_environment_succeeds_actionable_rows() {
    let plan = fixture_plan("prod");
    let at = Utc.with_ymd_and_hms(2025, 12, 11, 9, 30, 0).unwrap();

    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-1", at);

    assert_eq!(audit.len(), plan.rows.len());
    assert_eq!(count(&audit, AuditStatus::Success), 6);
    assert_eq!(count(&audit, AuditStatus::Skipped), 4);

    for (row, entry) in plan.rows.iter().zip(&audit) {
        assert_eq!(entry.action, row.action().to_string());
        let expected = if row.action() == PlanAction::NoOp {
            AuditStatus::Skipped
        } else {
            AuditStatus::Success
        };
        assert_eq!(entry.status, expected);
    }
}

#[test]
fn test_dry_run_environment_skips_everything() {
    let plan = fixture_plan("dev");
    assert_eq!(plan.execution_mode, ExecutionMode::DryRun);

    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-2", Utc::now());

    assert_eq!(count(&audit, AuditStatus::Success), 0);
    assert_eq!(count(&audit, AuditStatus::Skipped), 10);
}

#[test]
fn test_relationship_rows_inherit_environment_mode() {
    let plan = fixture_plan("dev");

    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-3", Utc::now());

    let link = audit
        .iter()
        .find(|a| a.action == "ADD_RELATIONSHIP")
        .unwrap();
    assert_eq!(link.status, AuditStatus::Skipped);
    assert_eq!(link.resource_type, "relationship");
    assert_eq!(link.resource_name, "role_assignment:analysts -> viewer");
}

#[test]
fn test_missing_endpoint_is_audited_as_the_resource() {
    let plan = fixture_plan("prod");

    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-4", Utc::now());

    let endpoints: Vec<(&str, &str)> = audit
        .iter()
        .filter(|a| a.action == "CREATE_RESOURCE")
        .map(|a| (a.resource_type.as_str(), a.resource_name.as_str()))
        .collect();
    assert_eq!(endpoints, vec![("user", "bob"), ("dataset", "sales")]);
}

#[test]
fn test_rows_share_run_id_and_timestamp() {
    let plan = fixture_plan("prod");
    let at = Utc.with_ymd_and_hms(2025, 12, 11, 9, 30, 0).unwrap();

    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-5", at);

    assert!(audit.iter().all(|a| a.execution_id == "run-5"));
    assert!(audit.iter().all(|a| a.timestamp == "2025-12-11T09:30:00Z"));
}

#[test]
fn test_simulate_generates_one_id_per_run() {
    let plan = fixture_plan("prod");

    let first = simulate(&plan);
    let second = simulate(&plan);

    let id = &first[0].execution_id;
    assert!(!id.is_empty());
    assert!(first.iter().all(|a| &a.execution_id == id));
    assert_ne!(second[0].execution_id, *id);
}

#[test]
fn test_empty_plan_yields_empty_audit() {
    let audit = simulate_with(&[], ExecutionMode::Apply, "run-6", Utc::now());
    assert!(audit.is_empty());

    let report = generate_report(&audit, ExecutionMode::Apply);
    assert_eq!(report.execution_id, None);
    assert_eq!(report.succeeded, 0);
}

#[test]
fn test_report_summarizes_run() {
    let plan = fixture_plan("prod");
    let audit = simulate_with(&plan.rows, plan.execution_mode, "run-7", Utc::now());

    let report = generate_report(&audit, plan.execution_mode);

    assert_eq!(report.succeeded, 6);
    assert_eq!(report.skipped, 4);
    assert_eq!(
        report.to_string(),
        "Simulation complete! Actions: 6 succeeded, 4 skipped. Mode: apply. Run: run-7."
    );
}

#[test]
fn test_new_dataset_under_dry_run_is_skipped() {
    let registry = GovernanceRegistry {
        resources: vec![govplane::registry::models::Resource::new(
            "R01", "dataset", "new_ds", true,
        )],
        relationships: vec![],
        environments: vec![govplane::registry::models::EnvironmentConfig::new(
            "dev",
            ExecutionMode::DryRun,
        )],
    };
    let observed = ObservedState::new().with_empty_type("dataset");
    let plan = ExecutionPlan::build(&registry, "dev", &observed).unwrap();

    let audit = simulate(&plan);

    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "CREATE");
    assert_eq!(audit[0].status, AuditStatus::Skipped);
}
