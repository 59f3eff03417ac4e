use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::path::Path;

use super::models::{EnvironmentConfig, Relationship, Resource};
use crate::config::loader::{self, DataLayout};

/// Load every row of a headered CSV file.
///
/// The file is opened, read fully and closed before returning. A missing
/// file or a row that does not match `T` fails the whole load.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row: T = result
            .with_context(|| format!("Failed to read row {} of {}", idx + 2, path.display()))?;
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded table");
    Ok(rows)
}

/// The declarative governance tables, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct GovernanceRegistry {
    pub resources: Vec<Resource>,
    pub relationships: Vec<Relationship>,
    pub environments: Vec<EnvironmentConfig>,
}

impl GovernanceRegistry {
    pub fn load(layout: &DataLayout) -> Result<Self> {
        let resources = read_table(&layout.input(loader::RESOURCE_REGISTRY))?;
        let relationships = read_table(&layout.input(loader::RELATIONSHIP_REGISTRY))?;
        let environments = read_table(&layout.input(loader::ENVIRONMENT_CONFIG))?;

        let registry = Self {
            resources,
            relationships,
            environments,
        };
        tracing::info!(
            resources = registry.resources.len(),
            relationships = registry.relationships.len(),
            environments = registry.environments.len(),
            "Loaded governance registry"
        );
        Ok(registry)
    }

    /// Distinct environment names in file order.
    pub fn environment_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for env in &self.environments {
            if !names.contains(&env.environment.as_str()) {
                names.push(env.environment.as_str());
            }
        }
        names
    }
}

// ─── Lenient column decoders ────────────────────────────────────────────────

/// Accept the boolean spellings found in exported registries:
/// `true/false`, `True/False`, `1/0`, `yes/no`.
pub fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_bool(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean '{}'", raw)))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Accept a bare date or a timestamp and keep the calendar date.
pub fn flexible_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
