use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::loader::{self, DataLayout};
use crate::registry::reader::{flexible_bool, flexible_date, read_table};

fn default_true() -> bool {
    true
}

// ─── Dimension Tables ───────────────────────────────────────────────────────

/// A row of `team_registry.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
    pub monthly_budget_usd: f64,
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    pub is_active: bool,
}

/// A row of `user_registry.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    pub is_active: bool,
}

/// A row of `dataset_registry.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    pub dataset_name: String,
    #[serde(default)]
    pub size_gb: Option<f64>,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_partitioned: bool,
    #[serde(default)]
    pub owner_team_id: Option<String>,
}

/// A row of `query_usage_log.csv`.
///
/// Two export shapes exist: the older one carries `bytes_processed_gb` and
/// `executed_at`, the newer one `bytes_scanned_gb`, `event_date` and a
/// denormalized `team_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub query_id: String,
    pub user_id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    pub dataset_id: String,
    #[serde(alias = "bytes_scanned_gb")]
    pub bytes_processed_gb: f64,
    #[serde(alias = "executed_at", deserialize_with = "flexible_date")]
    pub event_date: NaiveDate,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub query_type: Option<String>,
}

/// A row of `cost_model.csv`. Only the first row is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub cost_per_gb_usd: f64,
    pub partition_discount_factor: f64,
    pub full_scan_penalty_factor: f64,
}

// ─── Derived Rows ───────────────────────────────────────────────────────────

/// Which pricing branch produced a query's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDriver {
    PartitionDiscount,
    FullScanPenalty,
}

impl fmt::Display for CostDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostDriver::PartitionDiscount => f.write_str("partition_discount"),
            CostDriver::FullScanPenalty => f.write_str("full_scan_penalty"),
        }
    }
}

/// A row of `cost_attribution.csv`: one per usage event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub query_id: String,
    pub team_id: String,
    pub user_id: String,
    /// Absent in attribution files written before datasets were tracked.
    #[serde(default)]
    pub dataset_id: Option<String>,
    pub calculated_cost_usd: f64,
    pub cost_driver: CostDriver,
    #[serde(deserialize_with = "flexible_date")]
    pub cost_date: NaiveDate,
}

// ─── Loading ────────────────────────────────────────────────────────────────

/// Every input table the cost aggregators need.
#[derive(Debug, Clone, Default)]
pub struct CostTables {
    pub teams: Vec<Team>,
    pub users: Vec<User>,
    pub datasets: Vec<Dataset>,
    pub usage: Vec<UsageEvent>,
    pub cost_models: Vec<CostModel>,
}

impl CostTables {
    pub fn load(layout: &DataLayout) -> Result<Self> {
        let tables = Self {
            teams: read_table(&layout.input(loader::TEAM_REGISTRY))?,
            users: read_table(&layout.input(loader::USER_REGISTRY))?,
            datasets: read_table(&layout.input(loader::DATASET_REGISTRY))?,
            usage: read_table(&layout.input(loader::QUERY_USAGE_LOG))?,
            cost_models: read_table(&layout.input(loader::COST_MODEL))?,
        };
        tracing::info!(
            teams = tables.teams.len(),
            users = tables.users.len(),
            datasets = tables.datasets.len(),
            events = tables.usage.len(),
            "Loaded cost tables"
        );
        Ok(tables)
    }
}
