use serde::Serialize;
use std::fmt;

use crate::error::PlanError;
use crate::registry::models::{find_environment, ExecutionMode, ResourceType};
use crate::registry::reader::GovernanceRegistry;
use crate::state::observed::ObservedState;

use super::relationship::generate_relationship_plan;
use super::resource::generate_resource_plan;

/// Priority shared by every relationship-plan row. It ranks after all
/// resource-level creates so endpoints exist before they are linked.
pub const RELATIONSHIP_PRIORITY: u32 = 100;

/// The action proposed for one plan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanAction {
    /// A declared resource is missing from observed state.
    Create,
    /// A relationship endpoint is missing from observed state.
    CreateResource,
    /// Both endpoints exist but the pair does not.
    AddRelationship,
    NoOp,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::Create => "CREATE",
            PlanAction::CreateResource => "CREATE_RESOURCE",
            PlanAction::AddRelationship => "ADD_RELATIONSHIP",
            PlanAction::NoOp => "NO_OP",
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, named resource as seen from a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub resource_type: ResourceType,
    pub resource_name: String,
}

impl ResourceRef {
    pub fn new(resource_type: ResourceType, resource_name: &str) -> Self {
        Self {
            resource_type,
            resource_name: resource_name.to_string(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.resource_name)
    }
}

/// One row of the resource plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePlanRow {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub action: PlanAction,
    pub execution_mode: ExecutionMode,
    pub priority: u32,
}

/// One row of the relationship plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPlanRow {
    pub relationship_type: String,
    pub source: ResourceRef,
    pub target: ResourceRef,
    /// The endpoint to create when `action` is `CreateResource`.
    pub missing: Option<ResourceRef>,
    pub action: PlanAction,
    pub details: String,
    pub priority: u32,
}

/// A merged plan row, tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRow {
    Resource(ResourcePlanRow),
    Relationship(RelationshipPlanRow),
}

impl PlanRow {
    pub fn action(&self) -> PlanAction {
        match self {
            PlanRow::Resource(r) => r.action,
            PlanRow::Relationship(r) => r.action,
        }
    }

    pub fn priority(&self) -> u32 {
        match self {
            PlanRow::Resource(r) => r.priority,
            PlanRow::Relationship(r) => r.priority,
        }
    }

    /// Relationship rows carry no mode of their own.
    pub fn execution_mode(&self) -> Option<ExecutionMode> {
        match self {
            PlanRow::Resource(r) => Some(r.execution_mode),
            PlanRow::Relationship(_) => None,
        }
    }

    /// The (type, name) an audit record is written against.
    ///
    /// A missing endpoint is audited as the resource itself. Any other
    /// relationship row is audited as `relationship` named
    /// `<relationship_type>:<source> -> <target>`.
    pub fn subject(&self) -> (String, String) {
        match self {
            PlanRow::Resource(r) => (r.resource_type.to_string(), r.resource_name.clone()),
            PlanRow::Relationship(r) => match &r.missing {
                Some(m) => (m.resource_type.to_string(), m.resource_name.clone()),
                None => (
                    "relationship".to_string(),
                    format!(
                        "{}:{} -> {}",
                        r.relationship_type, r.source.resource_name, r.target.resource_name
                    ),
                ),
            },
        }
    }

    /// Flatten into the union of both row kinds' columns.
    pub fn to_flat(&self) -> FlatPlanRow {
        match self {
            PlanRow::Resource(r) => FlatPlanRow {
                resource_type: Some(r.resource_type.to_string()),
                resource_name: Some(r.resource_name.clone()),
                relationship_type: None,
                source: None,
                target: None,
                action: r.action,
                details: None,
                priority: r.priority,
                execution_mode: Some(r.execution_mode),
            },
            PlanRow::Relationship(r) => FlatPlanRow {
                resource_type: r.missing.as_ref().map(|m| m.resource_type.to_string()),
                resource_name: r.missing.as_ref().map(|m| m.resource_name.clone()),
                relationship_type: Some(r.relationship_type.clone()),
                source: Some(r.source.to_string()),
                target: Some(r.target.to_string()),
                action: r.action,
                details: Some(r.details.clone()),
                priority: r.priority,
                execution_mode: None,
            },
        }
    }
}

/// Export shape for the merged plan. Columns that do not apply to a row's
/// kind are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatPlanRow {
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
    pub relationship_type: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub action: PlanAction,
    pub details: Option<String>,
    pub priority: u32,
    pub execution_mode: Option<ExecutionMode>,
}

/// Concatenate resource rows then relationship rows and stable-sort by
/// ascending priority. Ties keep concatenation order. Nothing is deduplicated.
pub fn merge_plans(
    resource_rows: Vec<ResourcePlanRow>,
    relationship_rows: Vec<RelationshipPlanRow>,
) -> Vec<PlanRow> {
    let mut rows: Vec<PlanRow> = resource_rows
        .into_iter()
        .map(PlanRow::Resource)
        .chain(relationship_rows.into_iter().map(PlanRow::Relationship))
        .collect();
    // sort_by_key is stable
    rows.sort_by_key(|r| r.priority());
    rows
}

/// The merged plan for one environment.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub environment: String,
    pub execution_mode: ExecutionMode,
    pub rows: Vec<PlanRow>,
}

impl ExecutionPlan {
    /// Run both generators against the registry and merge their output.
    pub fn build(
        registry: &GovernanceRegistry,
        environment: &str,
        observed: &ObservedState,
    ) -> Result<Self, PlanError> {
        let env = find_environment(&registry.environments, environment).ok_or_else(|| {
            PlanError::UnknownEnvironment {
                name: environment.to_string(),
            }
        })?;

        let resource_rows = generate_resource_plan(
            &registry.resources,
            &registry.environments,
            environment,
            observed,
        )?;
        let relationship_rows =
            generate_relationship_plan(&registry.relationships, &registry.resources, observed)?;

        let rows = merge_plans(resource_rows, relationship_rows);
        tracing::info!(
            environment = %environment,
            execution_mode = %env.execution_mode,
            rows = rows.len(),
            "Built execution plan"
        );

        Ok(Self {
            environment: env.environment.clone(),
            execution_mode: env.execution_mode,
            rows,
        })
    }

    pub fn count(&self, action: PlanAction) -> usize {
        self.rows.iter().filter(|r| r.action() == action).count()
    }

    /// True when every row is a no-op.
    pub fn is_converged(&self) -> bool {
        self.rows.iter().all(|r| r.action() == PlanAction::NoOp)
    }

    pub fn flat_rows(&self) -> Vec<FlatPlanRow> {
        self.rows.iter().map(PlanRow::to_flat).collect()
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let creates = self.count(PlanAction::Create);
        let endpoints = self.count(PlanAction::CreateResource);
        let links = self.count(PlanAction::AddRelationship);
        let no_ops = self.count(PlanAction::NoOp);
        if creates > 0 {
            parts.push(format!("{} to create", creates));
        }
        if endpoints > 0 {
            parts.push(format!("{} missing endpoint(s)", endpoints));
        }
        if links > 0 {
            parts.push(format!("{} relationship(s) to add", links));
        }
        if parts.is_empty() {
            write!(f, "No changes. {} resource(s) in sync.", no_ops)
        } else {
            write!(f, "Plan: {}, {} unchanged.", parts.join(", "), no_ops)
        }
    }
}
