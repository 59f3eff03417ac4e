use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::types::BudgetPolicy;

use super::round_cents;
use super::summary::TeamCostSummary;

/// Budget standing of a team. Every team always has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Normal,
    Warning,
    Breach,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::Normal => f.write_str("NORMAL"),
            BudgetStatus::Warning => f.write_str("WARNING"),
            BudgetStatus::Breach => f.write_str("BREACH"),
        }
    }
}

/// Classify spend against budget on the cent-rounded usage percentage, the
/// same figure written to the team summary: at or above `breach_pct` is
/// BREACH, at or above `warning_pct` is WARNING, anything lower is NORMAL.
///
/// A zero budget with any spend is BREACH. A zero budget with no spend is NORMAL.
pub fn classify_budget(total_cost: f64, monthly_budget: f64, policy: &BudgetPolicy) -> BudgetStatus {
    let usage_pct = round_cents(budget_usage_pct(total_cost, monthly_budget));
    if usage_pct >= policy.breach_pct {
        BudgetStatus::Breach
    } else if usage_pct >= policy.warning_pct {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Normal
    }
}

/// Spend as a percentage of budget. A zero budget with any spend is
/// unbounded. A zero budget with no spend is 0%.
pub fn budget_usage_pct(total_cost: f64, monthly_budget: f64) -> f64 {
    if monthly_budget > 0.0 {
        total_cost / monthly_budget * 100.0
    } else if total_cost > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// A row of `budget_alerts.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub team_id: String,
    pub alert_type: BudgetStatus,
    pub threshold_pct: f64,
    pub triggered_at: String,
    pub status: String,
}

/// Open an alert for every team whose status is not NORMAL.
///
/// This is a filtered view of the team summary, so NORMAL teams emit no row.
pub fn budget_alerts(
    summaries: &[TeamCostSummary],
    policy: &BudgetPolicy,
    triggered_at: DateTime<Utc>,
) -> Vec<BudgetAlert> {
    let triggered_at = triggered_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    summaries
        .iter()
        .filter_map(|s| {
            let threshold_pct = match s.budget_status {
                BudgetStatus::Breach => policy.breach_pct,
                BudgetStatus::Warning => policy.warning_pct,
                BudgetStatus::Normal => return None,
            };
            tracing::warn!(
                team_id = %s.team_id,
                alert_type = %s.budget_status,
                usage_pct = s.budget_usage_pct,
                "Budget threshold crossed"
            );
            Some(BudgetAlert {
                team_id: s.team_id.clone(),
                alert_type: s.budget_status,
                threshold_pct,
                triggered_at: triggered_at.clone(),
                status: "open".to_string(),
            })
        })
        .collect()
}
