use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome the simulator assigns to one plan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    /// Either nothing to do, or the environment only records intent.
    Skipped,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Success => f.write_str("SUCCESS"),
            AuditStatus::Skipped => f.write_str("SKIPPED"),
        }
    }
}

/// A row of the execution audit. Rows are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    pub execution_id: String,
    pub resource_type: String,
    pub resource_name: String,
    pub action: String,
    pub status: AuditStatus,
    /// RFC 3339, shared by every row of one run.
    pub timestamp: String,
}
