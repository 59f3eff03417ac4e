use std::path::{Path, PathBuf};

use super::types::Settings;

pub const RESOURCE_REGISTRY: &str = "resource_registry.csv";
pub const RELATIONSHIP_REGISTRY: &str = "relationship_registry.csv";
pub const ENVIRONMENT_CONFIG: &str = "environment_config.csv";
pub const EXECUTION_AUDIT: &str = "execution_audit.csv";

pub const TEAM_REGISTRY: &str = "team_registry.csv";
pub const USER_REGISTRY: &str = "user_registry.csv";
pub const DATASET_REGISTRY: &str = "dataset_registry.csv";
pub const QUERY_USAGE_LOG: &str = "query_usage_log.csv";
pub const COST_MODEL: &str = "cost_model.csv";

pub const COST_ATTRIBUTION: &str = "cost_attribution.csv";
pub const BUDGET_ALERTS: &str = "budget_alerts.csv";
pub const COST_TRENDS: &str = "cost_trends.csv";
pub const TEAM_COST_SUMMARY: &str = "team_cost_summary.csv";
pub const USER_COST_SUMMARY: &str = "user_cost_summary.csv";
pub const DATASET_COST_SUMMARY: &str = "dataset_cost_summary.csv";
pub const DAILY_COST_SUMMARY: &str = "daily_cost_summary.csv";
pub const DRIVER_COST_SUMMARY: &str = "driver_cost_summary.csv";

/// Resolved on-disk locations for every table the tool reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLayout {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub state_file: PathBuf,
}

impl DataLayout {
    /// Resolve settings into concrete paths.
    ///
    /// `data_dir_override` (the `--data-dir` flag) replaces the configured data
    /// directory. Relative `output_dir` and `state_file` settings are resolved
    /// against the data directory, whichever one is in effect.
    pub fn resolve(settings: &Settings, data_dir_override: Option<&Path>) -> Self {
        let data_dir = match data_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from(&settings.data_dir),
        };
        let output_dir = under(&data_dir, &settings.output_dir);
        let state_file = under(&data_dir, &settings.state_file);

        tracing::debug!(
            data_dir = %data_dir.display(),
            output_dir = %output_dir.display(),
            state_file = %state_file.display(),
            "Resolved data layout"
        );

        Self {
            data_dir,
            output_dir,
            state_file,
        }
    }

    /// Path of an input table inside the data directory.
    pub fn input(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Path of a derived table inside the output directory.
    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// `path` itself when absolute, else `path` joined under `base`.
fn under(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_live_under_data_dir() {
        let layout = DataLayout::resolve(&Settings::default(), None);
        assert_eq!(layout.data_dir, PathBuf::from("data"));
        assert_eq!(layout.output_dir, PathBuf::from("data/derived"));
        assert_eq!(layout.state_file, PathBuf::from("data/observed_state.yaml"));
    }

    #[test]
    fn override_keeps_configured_output_dir() {
        let settings = Settings {
            output_dir: "reports/cost".to_string(),
            ..Settings::default()
        };
        let layout = DataLayout::resolve(&settings, Some(Path::new("/tmp/gov")));
        assert_eq!(layout.data_dir, PathBuf::from("/tmp/gov"));
        assert_eq!(layout.output_dir, PathBuf::from("/tmp/gov/reports/cost"));
        assert_eq!(layout.state_file, PathBuf::from("/tmp/gov/observed_state.yaml"));
        assert_eq!(
            layout.input(RESOURCE_REGISTRY),
            PathBuf::from("/tmp/gov/resource_registry.csv")
        );
    }

    #[test]
    fn absolute_output_dir_is_kept() {
        let settings = Settings {
            output_dir: "/var/lib/govplane/derived".to_string(),
            ..Settings::default()
        };
        let layout = DataLayout::resolve(&settings, Some(Path::new("/tmp/gov")));
        assert_eq!(layout.output_dir, PathBuf::from("/var/lib/govplane/derived"));
    }
}
