use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::types::BudgetPolicy;

use super::budget::{budget_usage_pct, classify_budget, BudgetStatus};
use super::models::{CostDriver, CostRecord, Dataset, Team, User};
use super::round_cents;

/// A row of `team_cost_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCostSummary {
    pub team_id: String,
    pub team_name: String,
    pub monthly_budget_usd: f64,
    pub total_cost_usd: f64,
    pub budget_usage_pct: f64,
    pub budget_status: BudgetStatus,
}

/// A row of `user_cost_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCostSummary {
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    pub total_cost_usd: f64,
}

/// A row of `dataset_cost_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCostSummary {
    pub dataset_id: String,
    pub dataset_name: String,
    pub total_cost_usd: f64,
}

/// A row of `daily_cost_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCostSummary {
    pub date: NaiveDate,
    pub total_cost_usd: f64,
}

/// A row of `driver_cost_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCostSummary {
    pub cost_driver: CostDriver,
    pub total_cost_usd: f64,
}

/// Sum cost per key. Keys come back sorted.
fn sum_by<K: Ord, F: Fn(&CostRecord) -> Option<K>>(records: &[CostRecord], key: F) -> BTreeMap<K, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *totals.entry(k).or_insert(0.0) += record.calculated_cost_usd;
        }
    }
    totals
}

/// Per-team spend against budget, in registry order.
///
/// Every registered team appears, with zero spend if it ran no queries.
pub fn team_cost_summary(
    records: &[CostRecord],
    teams: &[Team],
    policy: &BudgetPolicy,
) -> Vec<TeamCostSummary> {
    let totals: HashMap<String, f64> = sum_by(records, |r| Some(r.team_id.clone()))
        .into_iter()
        .collect();

    teams
        .iter()
        .map(|team| {
            // Status is derived from the same rounded figures the row reports.
            let total = round_cents(totals.get(&team.team_id).copied().unwrap_or(0.0));
            TeamCostSummary {
                team_id: team.team_id.clone(),
                team_name: team.team_name.clone(),
                monthly_budget_usd: team.monthly_budget_usd,
                total_cost_usd: total,
                budget_usage_pct: round_cents(budget_usage_pct(total, team.monthly_budget_usd)),
                budget_status: classify_budget(total, team.monthly_budget_usd, policy),
            }
        })
        .collect()
}

/// Per-user spend. Users missing from the registry are dropped.
pub fn user_cost_summary(records: &[CostRecord], users: &[User]) -> Vec<UserCostSummary> {
    let users_by_id: HashMap<&str, &User> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    sum_by(records, |r| Some(r.user_id.clone()))
        .into_iter()
        .filter_map(|(user_id, total)| {
            let user = users_by_id.get(user_id.as_str())?;
            Some(UserCostSummary {
                user_name: user.user_name.clone(),
                team_id: user.team_id.clone(),
                user_id,
                total_cost_usd: round_cents(total),
            })
        })
        .collect()
}

/// Per-dataset spend. Records without a dataset, and datasets missing from
/// the registry, are dropped.
pub fn dataset_cost_summary(records: &[CostRecord], datasets: &[Dataset]) -> Vec<DatasetCostSummary> {
    let datasets_by_id: HashMap<&str, &Dataset> =
        datasets.iter().map(|d| (d.dataset_id.as_str(), d)).collect();

    sum_by(records, |r| r.dataset_id.clone())
        .into_iter()
        .filter_map(|(dataset_id, total)| {
            let dataset = datasets_by_id.get(dataset_id.as_str())?;
            Some(DatasetCostSummary {
                dataset_name: dataset.dataset_name.clone(),
                dataset_id,
                total_cost_usd: round_cents(total),
            })
        })
        .collect()
}

pub fn daily_cost_summary(records: &[CostRecord]) -> Vec<DailyCostSummary> {
    sum_by(records, |r| Some(r.cost_date))
        .into_iter()
        .map(|(date, total)| DailyCostSummary {
            date,
            total_cost_usd: round_cents(total),
        })
        .collect()
}

pub fn driver_cost_summary(records: &[CostRecord]) -> Vec<DriverCostSummary> {
    sum_by(records, |r| Some(r.cost_driver))
        .into_iter()
        .map(|(cost_driver, total)| DriverCostSummary {
            cost_driver,
            total_cost_usd: round_cents(total),
        })
        .collect()
}
