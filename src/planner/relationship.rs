use std::collections::HashMap;

use crate::error::PlanError;
use crate::registry::models::{Relationship, Resource};
use crate::state::observed::ObservedState;

use super::plan::{PlanAction, RelationshipPlanRow, ResourceRef, RELATIONSHIP_PRIORITY};

/// Decide what each active relationship needs.
///
/// Endpoints are checked source first, then target. The first missing one
/// yields a CREATE_RESOURCE row and nothing else is evaluated for that
/// relationship in this pass, so a missing target behind a missing source
/// is reported on a later run. Only when both endpoints exist is the pair
/// itself compared: ADD_RELATIONSHIP if absent, NO_OP if present.
pub fn generate_relationship_plan(
    relationships: &[Relationship],
    resources: &[Resource],
    observed: &ObservedState,
) -> Result<Vec<RelationshipPlanRow>, PlanError> {
    // Lookup covers inactive resources too: an id is either known or a data error.
    let lookup: HashMap<&str, &Resource> = resources
        .iter()
        .map(|r| (r.resource_id.as_str(), r))
        .collect();

    let resolve = |rel: &Relationship, id: &str| -> Result<ResourceRef, PlanError> {
        lookup
            .get(id)
            .map(|r| ResourceRef::new(r.resource_type.clone(), &r.resource_name))
            .ok_or_else(|| PlanError::UnknownResource {
                relationship_type: rel.relationship_type.clone(),
                resource_id: id.to_string(),
            })
    };

    let mut rows = Vec::new();

    for rel in relationships.iter().filter(|r| r.is_active) {
        let source = resolve(rel, &rel.source_resource_id)?;
        let target = resolve(rel, &rel.target_resource_id)?;

        let missing = [&source, &target]
            .into_iter()
            .find(|r| !observed.has_resource(&r.resource_type, &r.resource_name))
            .cloned();

        let row = match missing {
            Some(endpoint) => RelationshipPlanRow {
                relationship_type: rel.relationship_type.clone(),
                details: format!("{} missing", endpoint.resource_type),
                missing: Some(endpoint),
                source,
                target,
                action: PlanAction::CreateResource,
                priority: RELATIONSHIP_PRIORITY,
            },
            None => {
                let exists = observed.has_relationship(
                    &rel.relationship_type,
                    &source.resource_name,
                    &target.resource_name,
                );
                let (action, details) = if exists {
                    (PlanAction::NoOp, "relationship exists")
                } else {
                    (PlanAction::AddRelationship, "relationship missing")
                };
                RelationshipPlanRow {
                    relationship_type: rel.relationship_type.clone(),
                    source,
                    target,
                    missing: None,
                    action,
                    details: details.to_string(),
                    priority: RELATIONSHIP_PRIORITY,
                }
            }
        };

        tracing::debug!(
            relationship_type = %row.relationship_type,
            source = %row.source,
            target = %row.target,
            action = %row.action,
            "Planned relationship"
        );
        rows.push(row);
    }

    Ok(rows)
}
