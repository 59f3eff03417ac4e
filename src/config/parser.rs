use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::types::GovConfig;

/// File name looked up when `-c` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "govplane.yaml";

/// Load config from a YAML file.
///
/// - If `path` exists, parse it.
/// - If `path` is the default `govplane.yaml` and doesn't exist, fall back to defaults.
/// - Any other missing path is an error.
pub fn load_config(path: &str) -> Result<GovConfig> {
    let p = Path::new(path);

    if p.is_file() {
        let content = fs::read_to_string(p)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config = parse_config(&content)
            .with_context(|| format!("Failed to parse YAML in: {}", path))?;
        tracing::info!(path = %path, project = %config.project.name, "Loaded config");
        return Ok(config);
    }

    if path == DEFAULT_CONFIG_FILE && !p.exists() {
        tracing::info!("No {} found, using default settings", DEFAULT_CONFIG_FILE);
        return Ok(GovConfig::default());
    }

    bail!(
        "Config not found: '{}'. Place {} in the current directory or specify a path with -c",
        path,
        DEFAULT_CONFIG_FILE
    )
}

/// Parse YAML content into a GovConfig.
pub fn parse_config(content: &str) -> Result<GovConfig> {
    let config: GovConfig =
        serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;
    Ok(config)
}
