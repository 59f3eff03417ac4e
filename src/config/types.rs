use serde::{Deserialize, Serialize};

// ─── Top-Level Config ───────────────────────────────────────────────────────

/// Root configuration parsed from `govplane.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub budget: BudgetPolicy,
}

/// Project-level metadata and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            settings: Settings::default(),
        }
    }
}

/// Where registry tables are read from and derived tables are written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Derived tables, relative to `data_dir` unless absolute.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Observed-state snapshot, relative to `data_dir` unless absolute.
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            state_file: default_state_file(),
        }
    }
}

// ─── Budget ─────────────────────────────────────────────────────────────────

/// Budget-usage thresholds, as percentages of `monthly_budget_usd`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPolicy {
    #[serde(default = "default_warning_pct")]
    pub warning_pct: f64,
    #[serde(default = "default_breach_pct")]
    pub breach_pct: f64,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            warning_pct: default_warning_pct(),
            breach_pct: default_breach_pct(),
        }
    }
}

fn default_project_name() -> String {
    "govplane-project".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_output_dir() -> String {
    "derived".to_string()
}

fn default_state_file() -> String {
    "observed_state.yaml".to_string()
}

fn default_warning_pct() -> f64 {
    80.0
}

fn default_breach_pct() -> f64 {
    100.0
}
