use std::collections::HashMap;

use crate::error::CostError;

use super::models::{CostDriver, CostModel, CostRecord, Dataset, UsageEvent, User};
use super::round_cents;

/// The first row of the cost model table.
pub fn active_cost_model(rows: &[CostModel]) -> Result<&CostModel, CostError> {
    rows.first().ok_or(CostError::MissingCostModel)
}

/// Price one query against its dataset.
///
/// Partitioned datasets get the discount factor, everything else the
/// full-scan penalty. The two branches are exclusive.
pub fn price_query(bytes_gb: f64, dataset: &Dataset, model: &CostModel) -> (f64, CostDriver) {
    let base = bytes_gb * model.cost_per_gb_usd;
    if dataset.is_partitioned {
        (
            round_cents(base * model.partition_discount_factor),
            CostDriver::PartitionDiscount,
        )
    } else {
        (
            round_cents(base * model.full_scan_penalty_factor),
            CostDriver::FullScanPenalty,
        )
    }
}

/// Derive one cost record per usage event.
///
/// The team comes from the event when the log carries it, else from the
/// user registry. Unknown datasets and users fail the whole pass.
pub fn attribute_costs(
    events: &[UsageEvent],
    datasets: &[Dataset],
    users: &[User],
    model: &CostModel,
) -> Result<Vec<CostRecord>, CostError> {
    let datasets_by_id: HashMap<&str, &Dataset> =
        datasets.iter().map(|d| (d.dataset_id.as_str(), d)).collect();
    let users_by_id: HashMap<&str, &User> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut records = Vec::with_capacity(events.len());
    for event in events {
        let dataset = datasets_by_id
            .get(event.dataset_id.as_str())
            .ok_or_else(|| CostError::UnknownDataset {
                query_id: event.query_id.clone(),
                dataset_id: event.dataset_id.clone(),
            })?;

        let team_id = match event.team_id.as_deref().filter(|t| !t.is_empty()) {
            Some(team) => team.to_string(),
            None => users_by_id
                .get(event.user_id.as_str())
                .map(|u| u.team_id.clone())
                .ok_or_else(|| CostError::UnknownUser {
                    query_id: event.query_id.clone(),
                    user_id: event.user_id.clone(),
                })?,
        };

        let (cost, driver) = price_query(event.bytes_processed_gb, dataset, model);
        records.push(CostRecord {
            query_id: event.query_id.clone(),
            team_id,
            user_id: event.user_id.clone(),
            dataset_id: Some(event.dataset_id.clone()),
            calculated_cost_usd: cost,
            cost_driver: driver,
            cost_date: event.event_date,
        });
    }

    tracing::info!(records = records.len(), "Attributed query cost");
    Ok(records)
}
