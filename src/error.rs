use thiserror::Error;

/// Referential-integrity failures raised while building a plan.
///
/// These are data errors in the registry tables, not transient conditions,
/// so callers surface them and stop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The selected environment has no row in `environment_config.csv`.
    #[error("Environment '{name}' not found in environment config")]
    UnknownEnvironment { name: String },

    /// A relationship points at a resource id missing from the resource registry.
    #[error("Relationship '{relationship_type}' references unknown resource_id '{resource_id}'")]
    UnknownResource {
        relationship_type: String,
        resource_id: String,
    },
}

/// Referential-integrity failures raised while attributing query cost.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CostError {
    #[error("Query '{query_id}' references unknown dataset_id '{dataset_id}'")]
    UnknownDataset { query_id: String, dataset_id: String },

    #[error("Query '{query_id}' references unknown user_id '{user_id}'")]
    UnknownUser { query_id: String, user_id: String },

    #[error("Cost model table is empty")]
    MissingCostModel,
}
