use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::{CostRecord, Team};
use super::round_cents;

/// Day-over-day movement of a team's spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// A row of `cost_trends.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTrend {
    pub team_id: String,
    pub date: NaiveDate,
    pub daily_cost_usd: f64,
    pub trend_direction: TrendDirection,
}

/// Daily spend per team, in registry order then date order.
///
/// Each day is compared with the team's previous active day. A team's
/// first day is `flat`. Days without spend produce no row.
pub fn cost_trends(records: &[CostRecord], teams: &[Team]) -> Vec<CostTrend> {
    let mut daily: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for r in records {
        *daily
            .entry(r.team_id.as_str())
            .or_default()
            .entry(r.cost_date)
            .or_insert(0.0) += r.calculated_cost_usd;
    }

    let mut trends = Vec::new();
    for team in teams {
        let Some(team_days) = daily.get(team.team_id.as_str()) else {
            continue;
        };
        let mut previous: Option<f64> = None;
        for (&date, &cost) in team_days {
            let cost = round_cents(cost);
            let trend_direction = match previous {
                Some(prev) if cost > prev => TrendDirection::Up,
                Some(prev) if cost < prev => TrendDirection::Down,
                _ => TrendDirection::Flat,
            };
            trends.push(CostTrend {
                team_id: team.team_id.clone(),
                date,
                daily_cost_usd: cost,
                trend_direction,
            });
            previous = Some(cost);
        }
    }
    trends
}
