use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::registry::models::ResourceType;

/// What the control plane believes currently exists.
///
/// The snapshot is the reconciliation baseline for every planner call. It is
/// passed in explicitly and never mutated by planning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedState {
    /// resource_type → resource names.
    #[serde(default)]
    pub resources: BTreeMap<ResourceType, BTreeSet<String>>,
    /// relationship_type → (source_name, target_name) pairs.
    #[serde(default)]
    pub relationships: BTreeMap<String, BTreeSet<(String, String)>>,
}

/// One flattened entry of the snapshot, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedEntry {
    pub kind: String,
    pub entry_type: String,
    pub name: String,
}

impl ObservedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read observed state: {}", path.display()))?;
        let state = Self::parse(&content)
            .with_context(|| format!("Failed to parse observed state: {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            resources = state.resource_count(),
            relationships = state.relationship_count(),
            "Loaded observed state"
        );
        Ok(state)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let state: ObservedState =
            serde_yaml::from_str(content).context("Failed to parse observed state YAML")?;
        Ok(state)
    }

    /// Record a resource as existing.
    pub fn with_resource(mut self, resource_type: impl Into<ResourceType>, name: &str) -> Self {
        self.resources
            .entry(resource_type.into())
            .or_default()
            .insert(name.to_string());
        self
    }

    /// Declare a resource type with no existing instances.
    pub fn with_empty_type(mut self, resource_type: impl Into<ResourceType>) -> Self {
        self.resources.entry(resource_type.into()).or_default();
        self
    }

    /// Record a relationship pair as existing.
    pub fn with_relationship(mut self, relationship_type: &str, source: &str, target: &str) -> Self {
        self.relationships
            .entry(relationship_type.to_string())
            .or_default()
            .insert((source.to_string(), target.to_string()));
        self
    }

    pub fn has_resource(&self, resource_type: &ResourceType, name: &str) -> bool {
        self.resources
            .get(resource_type)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    pub fn has_relationship(&self, relationship_type: &str, source: &str, target: &str) -> bool {
        self.relationships
            .get(relationship_type)
            .map(|pairs| pairs.contains(&(source.to_string(), target.to_string())))
            .unwrap_or(false)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.values().map(|s| s.len()).sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.values().map(|s| s.len()).sum()
    }

    /// Flatten the snapshot into display rows, resources first.
    pub fn entries(&self) -> Vec<ObservedEntry> {
        let mut entries = Vec::new();
        for (resource_type, names) in &self.resources {
            for name in names {
                entries.push(ObservedEntry {
                    kind: "resource".to_string(),
                    entry_type: resource_type.to_string(),
                    name: name.clone(),
                });
            }
        }
        for (relationship_type, pairs) in &self.relationships {
            for (source, target) in pairs {
                entries.push(ObservedEntry {
                    kind: "relationship".to_string(),
                    entry_type: relationship_type.clone(),
                    name: format!("{} -> {}", source, target),
                });
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snapshot_yaml() {
        let yaml = r#"
resources:
  user: [alice, bob]
  dataset: []
relationships:
  group_membership:
    - [alice, analysts]
"#;
        let state = ObservedState::parse(yaml).unwrap();
        assert!(state.has_resource(&ResourceType::User, "alice"));
        assert!(!state.has_resource(&ResourceType::Dataset, "sales"));
        assert!(!state.has_resource(&ResourceType::Group, "analysts"));
        assert!(state.has_relationship("group_membership", "alice", "analysts"));
        assert!(!state.has_relationship("group_membership", "analysts", "alice"));
        assert_eq!(state.resource_count(), 2);
        assert_eq!(state.entries().len(), 3);
    }

    #[test]
    fn empty_document_sections_default() {
        let state = ObservedState::parse("resources: {}\n").unwrap();
        assert_eq!(state, ObservedState::new());
    }
}
