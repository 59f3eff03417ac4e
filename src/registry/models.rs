use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::reader::flexible_bool;

// ─── Resource Types ─────────────────────────────────────────────────────────

/// Priority given to resource types outside the known hierarchy.
pub const UNKNOWN_TYPE_PRIORITY: u32 = 99;

/// A governed resource kind. Lower-level kinds are created first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    User,
    Group,
    Role,
    Model,
    Dataset,
    Other(String),
}

impl ResourceType {
    /// Fixed creation priority: user=1, group=2, role=3, model=4, dataset=5.
    pub fn priority(&self) -> u32 {
        match self {
            ResourceType::User => 1,
            ResourceType::Group => 2,
            ResourceType::Role => 3,
            ResourceType::Model => 4,
            ResourceType::Dataset => 5,
            ResourceType::Other(_) => UNKNOWN_TYPE_PRIORITY,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::User => "user",
            ResourceType::Group => "group",
            ResourceType::Role => "role",
            ResourceType::Model => "model",
            ResourceType::Dataset => "dataset",
            ResourceType::Other(s) => s,
        }
    }
}

impl From<String> for ResourceType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "user" => ResourceType::User,
            "group" => ResourceType::Group,
            "role" => ResourceType::Role,
            "model" => ResourceType::Model,
            "dataset" => ResourceType::Dataset,
            _ => ResourceType::Other(s.trim().to_string()),
        }
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        ResourceType::from(s.to_string())
    }
}

impl From<ResourceType> for String {
    fn from(t: ResourceType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Execution Mode ─────────────────────────────────────────────────────────

/// How an environment treats planned actions.
///
/// Decoding goes through [`FromStr`], so `DRY_RUN` and `Apply` are accepted
/// as exported by spreadsheet tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ExecutionMode {
    /// Actions are computed but never applied.
    DryRun,
    Apply,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::DryRun => "dry_run",
            ExecutionMode::Apply => "apply",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dry_run" => Ok(ExecutionMode::DryRun),
            "apply" => Ok(ExecutionMode::Apply),
            other => anyhow::bail!("Unknown execution mode '{}'", other),
        }
    }
}

impl TryFrom<String> for ExecutionMode {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ─── Registry Rows ──────────────────────────────────────────────────────────

/// A row of `resource_registry.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub resource_name: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_active: bool,
}

impl Resource {
    pub fn new(id: &str, resource_type: &str, name: &str, is_active: bool) -> Self {
        Self {
            resource_id: id.to_string(),
            resource_type: ResourceType::from(resource_type),
            resource_name: name.to_string(),
            is_active,
        }
    }
}

/// A row of `relationship_registry.csv`. The relationship type is opaque here;
/// membership, assignment and access semantics live outside this tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub relationship_type: String,
    pub source_resource_id: String,
    pub target_resource_id: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_active: bool,
}

impl Relationship {
    pub fn new(relationship_type: &str, source: &str, target: &str, is_active: bool) -> Self {
        Self {
            relationship_type: relationship_type.to_string(),
            source_resource_id: source.to_string(),
            target_resource_id: target.to_string(),
            is_active,
        }
    }
}

/// A row of `environment_config.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub execution_mode: ExecutionMode,
}

impl EnvironmentConfig {
    pub fn new(environment: &str, execution_mode: ExecutionMode) -> Self {
        Self {
            environment: environment.to_string(),
            execution_mode,
        }
    }
}

/// Look up an environment by name.
pub fn find_environment<'a>(
    environments: &'a [EnvironmentConfig],
    name: &str,
) -> Option<&'a EnvironmentConfig> {
    environments.iter().find(|e| e.environment == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_priorities_are_fixed() {
        let ordered = ["user", "group", "role", "model", "dataset"];
        let priorities: Vec<u32> = ordered
            .iter()
            .map(|t| ResourceType::from(*t).priority())
            .collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
        assert_eq!(ResourceType::from("warehouse").priority(), 99);
    }

    #[test]
    fn unknown_type_keeps_its_name() {
        let t = ResourceType::from("Warehouse ");
        assert_eq!(t, ResourceType::Other("Warehouse".to_string()));
        assert_eq!(t.to_string(), "Warehouse");
    }

    #[test]
    fn execution_mode_parses_case_insensitively() {
        assert_eq!("DRY_RUN".parse::<ExecutionMode>().unwrap(), ExecutionMode::DryRun);
        assert_eq!("apply".parse::<ExecutionMode>().unwrap(), ExecutionMode::Apply);
        assert!("yolo".parse::<ExecutionMode>().is_err());
    }
}
