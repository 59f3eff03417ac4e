use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use super::models::{CostRecord, CostTables};
use super::round_cents;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpiValue {
    Count(usize),
    Currency(f64),
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Count(n) => write!(f, "{}", n),
            KpiValue::Currency(v) => write!(f, "${}", format_usd(*v)),
        }
    }
}

/// One headline figure of the cost dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub title: String,
    pub value: KpiValue,
    pub note: String,
}

impl Kpi {
    fn new(title: &str, value: KpiValue, note: &str) -> Self {
        Self {
            title: title.to_string(),
            value,
            note: note.to_string(),
        }
    }
}

/// Headline figures as of `today`.
///
/// Monthly cost covers the calendar month (and year) containing `today`.
pub fn compute_kpis(tables: &CostTables, records: &[CostRecord], today: NaiveDate) -> Vec<Kpi> {
    let users = tables.users.iter().filter(|u| u.is_active).count();
    let teams = tables.teams.iter().filter(|t| t.is_active).count();
    let queries_today = tables.usage.iter().filter(|e| e.event_date == today).count();

    let daily_cost: f64 = records
        .iter()
        .filter(|r| r.cost_date == today)
        .map(|r| r.calculated_cost_usd)
        .sum();
    let monthly_cost: f64 = records
        .iter()
        .filter(|r| r.cost_date.year() == today.year() && r.cost_date.month() == today.month())
        .map(|r| r.calculated_cost_usd)
        .sum();

    vec![
        Kpi::new("Users Monitored", KpiValue::Count(users), "Active users"),
        Kpi::new("Teams Monitored", KpiValue::Count(teams), "Active teams"),
        Kpi::new("Queries Today", KpiValue::Count(queries_today), "Queries run today"),
        Kpi::new(
            "Daily Cost",
            KpiValue::Currency(round_cents(daily_cost)),
            "Spend today",
        ),
        Kpi::new(
            "Monthly Cost",
            KpiValue::Currency(round_cents(monthly_cost)),
            "Spend this month",
        ),
    ]
}

/// `1234567.5` → `1,234,567.50`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}
