use std::fmt;

use crate::executor::audit::{AuditRow, AuditStatus};
use crate::registry::models::ExecutionMode;

/// Execution summary report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub execution_id: Option<String>,
    pub execution_mode: ExecutionMode,
    pub succeeded: usize,
    pub skipped: usize,
}

/// Summarize one simulator run.
pub fn generate_report(audit: &[AuditRow], execution_mode: ExecutionMode) -> Report {
    let succeeded = audit
        .iter()
        .filter(|a| a.status == AuditStatus::Success)
        .count();
    let skipped = audit
        .iter()
        .filter(|a| a.status == AuditStatus::Skipped)
        .count();

    Report {
        execution_id: audit.first().map(|a| a.execution_id.clone()),
        execution_mode,
        succeeded,
        skipped,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulation complete! Actions: {} succeeded, {} skipped. Mode: {}.",
            self.succeeded, self.skipped, self.execution_mode
        )?;
        if let Some(ref id) = self.execution_id {
            write!(f, " Run: {}.", id)?;
        }
        Ok(())
    }
}
