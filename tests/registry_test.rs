use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use govplane::config::loader::DataLayout;
use govplane::config::types::Settings;
use govplane::executor::audit::AuditRow;
use govplane::registry::models::{EnvironmentConfig, ExecutionMode, Resource, ResourceType};
use govplane::registry::reader::{parse_date, read_table, GovernanceRegistry};
use govplane::state::observed::ObservedState;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/governance")
}

fn load_fixture() -> GovernanceRegistry {
    let layout = DataLayout::resolve(&Settings::default(), Some(fixture_dir().as_path()));
    GovernanceRegistry::load(&layout).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_fixture_registry() {
    let registry = load_fixture();

    assert_eq!(registry.resources.len(), 7);
    assert_eq!(registry.relationships.len(), 5);
    assert_eq!(registry.environments.len(), 2);

    assert_eq!(registry.resources[0].resource_type, ResourceType::User);
    assert_eq!(registry.resources[4].resource_type, ResourceType::Model);
    assert!(!registry.resources[6].is_active);
    assert!(!registry.relationships[4].is_active);
    assert_eq!(registry.environments[1].execution_mode, ExecutionMode::Apply);
    assert_eq!(registry.environment_names(), vec!["dev", "prod"]);
}

#[test]
fn test_boolean_spellings() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "resource_registry.csv",
        "resource_id,resource_type,resource_name,is_active\n\
         R1,user,a,True\n\
         R2,user,b,false\n\
         R3,user,c,1\n\
         R4,user,d,0\n\
         R5,user,e,yes\n\
         R6,user,f,N\n",
    );

    let rows: Vec<Resource> = read_table(&path).unwrap();

    let flags: Vec<bool> = rows.iter().map(|r| r.is_active).collect();
    assert_eq!(flags, vec![true, false, true, false, true, false]);
}

#[test]
fn test_unrecognized_boolean_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "resource_registry.csv",
        "resource_id,resource_type,resource_name,is_active\nR1,user,a,maybe\n",
    );

    let err = read_table::<Resource>(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("row 2"));
}

#[test]
fn test_unknown_execution_mode_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "resource_registry.csv",
        "resource_id,resource_type,resource_name,is_active\n",
    );
    write(
        tmp.path(),
        "relationship_registry.csv",
        "relationship_type,source_resource_id,target_resource_id,is_active\n",
    );
    write(
        tmp.path(),
        "environment_config.csv",
        "environment,execution_mode\nqa,destroy\n",
    );

    let layout = DataLayout::resolve(&Settings::default(), Some(tmp.path()));
    assert!(GovernanceRegistry::load(&layout).is_err());
}

#[test]
fn test_execution_mode_spellings() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "environment_config.csv",
        "environment,execution_mode\ndev,DRY_RUN\nstage, Apply \nprod,apply\n",
    );

    let rows: Vec<EnvironmentConfig> = read_table(&path).unwrap();

    let modes: Vec<ExecutionMode> = rows.iter().map(|r| r.execution_mode).collect();
    assert_eq!(
        modes,
        vec![ExecutionMode::DryRun, ExecutionMode::Apply, ExecutionMode::Apply]
    );
    for row in &rows {
        assert_eq!(
            row.execution_mode.to_string().parse::<ExecutionMode>().unwrap(),
            row.execution_mode
        );
    }
}

#[test]
fn test_missing_registry_file_names_the_path() {
    let tmp = TempDir::new().unwrap();
    let layout = DataLayout::resolve(&Settings::default(), Some(tmp.path()));

    let err = GovernanceRegistry::load(&layout).unwrap_err();
    assert!(err.to_string().contains("resource_registry.csv"));
}

#[test]
fn test_header_only_tables_are_empty() {
    let rows: Vec<AuditRow> = read_table(&fixture_dir().join("execution_audit.csv")).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_date_formats() {
    let day = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    assert_eq!(parse_date("2025-12-10"), Some(day));
    assert_eq!(parse_date("2025-12-10 08:15:00"), Some(day));
    assert_eq!(parse_date("2025-12-10T08:15:00"), Some(day));
    assert_eq!(parse_date("2025-12-10 08:15:00.123456"), Some(day));
    assert_eq!(parse_date("2025-12-10T08:15:00Z"), Some(day));
    assert_eq!(parse_date("10/12/2025"), None);
}

// ─── Observed state ──────────────────────────────────────────────────────────

#[test]
fn test_load_fixture_state() {
    let state = ObservedState::load(&fixture_dir().join("observed_state.yaml")).unwrap();

    assert!(state.has_resource(&ResourceType::User, "alice"));
    assert!(!state.has_resource(&ResourceType::User, "bob"));
    assert!(!state.has_resource(&ResourceType::Model, "churn_model"));
    assert!(state.has_relationship("group_membership", "alice", "analysts"));
    assert!(!state.has_relationship("group_membership", "bob", "analysts"));
    assert_eq!(state.resource_count(), 3);
    assert_eq!(state.relationship_count(), 1);
}

#[test]
fn test_empty_state_file() {
    let state = ObservedState::parse("{}").unwrap();
    assert_eq!(state, ObservedState::new());
}

#[test]
fn test_state_entries_flatten_snapshot() {
    let state = ObservedState::new()
        .with_resource("group", "analysts")
        .with_relationship("group_membership", "alice", "analysts");

    let entries = state.entries();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, "resource");
    assert_eq!(entries[0].entry_type, "group");
    assert_eq!(entries[0].name, "analysts");
    assert_eq!(entries[1].kind, "relationship");
    assert_eq!(entries[1].name, "alice -> analysts");
}

#[test]
fn test_missing_state_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = ObservedState::load(&tmp.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read observed state"));
}
