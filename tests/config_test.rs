use std::fs;
use std::path::Path;
use tempfile::TempDir;

use govplane::config::loader::DataLayout;
use govplane::config::parser::{load_config, parse_config};
use govplane::config::validator::validate;

#[test]
fn test_parse_valid_config() {
    let yaml = r#"
project:
  name: "analytics-governance"
  settings:
    data_dir: "registry"
    output_dir: "derived"
    state_file: "snapshots/observed.yaml"
budget:
  warning_pct: 75
  breach_pct: 95
"#;

    let config = parse_config(yaml).expect("Should parse valid config");
    assert_eq!(config.project.name, "analytics-governance");
    assert_eq!(config.project.settings.data_dir, "registry");
    assert_eq!(config.project.settings.state_file, "snapshots/observed.yaml");
    assert_eq!(config.budget.warning_pct, 75.0);
    assert_eq!(config.budget.breach_pct, 95.0);
    assert!(validate(&config).is_ok());
}

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
project:
  name: "minimal"
"#;

    let config = parse_config(yaml).expect("Should parse minimal config");
    assert_eq!(config.project.name, "minimal");
    // Defaults should be applied
    assert_eq!(config.project.settings.data_dir, "data");
    assert_eq!(config.project.settings.output_dir, "derived");
    assert_eq!(config.project.settings.state_file, "observed_state.yaml");
    assert_eq!(config.budget.warning_pct, 80.0);
    assert_eq!(config.budget.breach_pct, 100.0);
}

#[test]
fn test_parse_empty_budget_section() {
    let yaml = r#"
project:
  name: "budgets"
budget: {}
"#;

    let config = parse_config(yaml).expect("Should parse");
    assert_eq!(config.budget.warning_pct, 80.0);
    assert_eq!(config.budget.breach_pct, 100.0);
}

#[test]
fn test_parse_invalid_yaml() {
    let yaml = "project: [unclosed";
    assert!(parse_config(yaml).is_err());
}

#[test]
fn test_validate_rejects_inverted_thresholds() {
    let yaml = r#"
project:
  name: "bad"
budget:
  warning_pct: 100
  breach_pct: 80
"#;

    let config = parse_config(yaml).unwrap();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("must be below breach_pct"));
}

#[test]
fn test_validate_rejects_non_positive_warning() {
    let yaml = r#"
project:
  name: "bad"
budget:
  warning_pct: 0
"#;

    let config = parse_config(yaml).unwrap();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("must be positive"));
}

#[test]
fn test_validate_rejects_empty_paths() {
    let yaml = r#"
project:
  name: "bad"
  settings:
    data_dir: "  "
"#;

    let config = parse_config(yaml).unwrap();
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("data_dir"));
}

#[test]
fn test_load_config_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("custom.yaml");
    fs::write(&path, "project:\n  name: from-file\n").unwrap();

    let config = load_config(path.to_str().unwrap()).unwrap();
    assert_eq!(config.project.name, "from-file");
}

#[test]
fn test_load_missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope.yaml");

    let err = load_config(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Config not found"));
}

#[test]
fn test_layout_from_fixture_config() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/governance");
    let config = load_config(fixture.join("govplane.yaml").to_str().unwrap()).unwrap();
    validate(&config).unwrap();

    let layout = DataLayout::resolve(&config.project.settings, Some(fixture.as_path()));
    assert_eq!(layout.data_dir, fixture);
    assert_eq!(layout.output_dir, fixture.join("derived"));
    assert_eq!(layout.state_file, fixture.join("observed_state.yaml"));
    assert_eq!(
        layout.input("team_registry.csv"),
        fixture.join("team_registry.csv")
    );
}

#[test]
fn test_layout_without_override_resolves_under_data_dir() {
    let config = parse_config(
        r#"
project:
  settings:
    data_dir: "registry"
    output_dir: "out"
    state_file: "/var/lib/govplane/state.yaml"
"#,
    )
    .unwrap();

    let layout = DataLayout::resolve(&config.project.settings, None);
    assert_eq!(layout.data_dir, Path::new("registry"));
    assert_eq!(layout.output(".x"), Path::new("registry/out/.x"));
    assert_eq!(layout.state_file, Path::new("/var/lib/govplane/state.yaml"));
}
