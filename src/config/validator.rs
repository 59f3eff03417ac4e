use anyhow::{bail, Result};

use super::types::{BudgetPolicy, GovConfig, Settings};

/// Validate the entire configuration for correctness.
pub fn validate(config: &GovConfig) -> Result<()> {
    validate_settings(&config.project.settings)?;
    validate_budget(&config.budget)?;
    Ok(())
}

/// Ensure every path setting is non-empty.
fn validate_settings(settings: &Settings) -> Result<()> {
    for (key, value) in [
        ("data_dir", &settings.data_dir),
        ("output_dir", &settings.output_dir),
        ("state_file", &settings.state_file),
    ] {
        if value.trim().is_empty() {
            bail!("Setting '{}' must not be empty", key);
        }
    }
    Ok(())
}

/// Thresholds must satisfy 0 < warning_pct < breach_pct.
fn validate_budget(budget: &BudgetPolicy) -> Result<()> {
    if !budget.warning_pct.is_finite() || !budget.breach_pct.is_finite() {
        bail!("Budget thresholds must be finite numbers");
    }
    if budget.warning_pct <= 0.0 {
        bail!(
            "Budget warning_pct must be positive, got {}",
            budget.warning_pct
        );
    }
    if budget.warning_pct >= budget.breach_pct {
        bail!(
            "Budget warning_pct ({}) must be below breach_pct ({})",
            budget.warning_pct,
            budget.breach_pct
        );
    }
    Ok(())
}
