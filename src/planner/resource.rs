use crate::error::PlanError;
use crate::registry::models::{find_environment, EnvironmentConfig, Resource};
use crate::state::observed::ObservedState;

use super::plan::{PlanAction, ResourcePlanRow};

/// Decide CREATE vs NO_OP for every active resource.
///
/// Inactive resources emit no row. The selected environment's execution
/// mode is copied onto every row.
pub fn generate_resource_plan(
    resources: &[Resource],
    environments: &[EnvironmentConfig],
    environment: &str,
    observed: &ObservedState,
) -> Result<Vec<ResourcePlanRow>, PlanError> {
    let env = find_environment(environments, environment).ok_or_else(|| {
        PlanError::UnknownEnvironment {
            name: environment.to_string(),
        }
    })?;

    let rows: Vec<ResourcePlanRow> = resources
        .iter()
        .filter(|r| r.is_active)
        .map(|r| {
            let action = if observed.has_resource(&r.resource_type, &r.resource_name) {
                PlanAction::NoOp
            } else {
                PlanAction::Create
            };
            tracing::debug!(
                resource_type = %r.resource_type,
                resource_name = %r.resource_name,
                action = %action,
                "Planned resource"
            );
            ResourcePlanRow {
                resource_type: r.resource_type.clone(),
                resource_name: r.resource_name.clone(),
                action,
                execution_mode: env.execution_mode,
                priority: r.resource_type.priority(),
            }
        })
        .collect();

    Ok(rows)
}
