//! # Tracker Config Repository
//!
//! Stores the tracker configuration in `{data_directory}/tracker_config.yaml`.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! default_stage_filter: all
//! default_role: staff
//! export_directory: null
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;

use shared::{Role, StageFilter};

use super::connection::CsvConnection;
use crate::backend::storage::traits::ConfigStorage;

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Data format version for future migrations
    pub data_format_version: String,
    /// Stage filter applied when none is given
    #[serde(default)]
    pub default_stage_filter: StageFilter,
    /// Role assumed when none is given
    #[serde(default)]
    pub default_role: Role,
    /// Directory exports are written to; the documents directory when unset
    #[serde(default)]
    pub export_directory: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            data_format_version: "1.0".to_string(),
            default_stage_filter: StageFilter::All,
            default_role: Role::Staff,
            export_directory: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// YAML-backed configuration repository
#[derive(Clone)]
pub struct ConfigRepository {
    connection: CsvConnection,
}

impl ConfigRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Load config from file, creating default if it doesn't exist
    fn load_or_create_config(&self) -> Result<TrackerConfig> {
        let config_path = self.connection.config_file_path()?;

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: TrackerConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            debug!("Loaded tracker config from {:?}", config_path);
            Ok(config)
        } else {
            let config = TrackerConfig::default();
            self.save_config(&config)?;
            info!("Created default tracker config at {:?}", config_path);
            Ok(config)
        }
    }

    fn save_config(&self, config: &TrackerConfig) -> Result<()> {
        let config_path = self.connection.config_file_path()?;
        let yaml_content = serde_yaml::to_string(config)?;

        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved tracker config to {:?}", config_path);
        Ok(())
    }
}

impl ConfigStorage for ConfigRepository {
    fn get_config(&self) -> Result<TrackerConfig> {
        self.load_or_create_config()
    }

    fn update_config(&self, config: &TrackerConfig) -> Result<()> {
        let mut updated_config = config.clone();
        updated_config.updated_at = Utc::now().to_rfc3339();
        self.save_config(&updated_config)?;
        info!("Updated tracker config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use shared::StageBucket;

    #[test]
    fn test_default_config_is_created_on_first_read() {
        let env = TestEnvironment::new().unwrap();
        let repo = ConfigRepository::new(env.connection.clone());

        let config = repo.get_config().unwrap();
        assert_eq!(config.data_format_version, "1.0");
        assert_eq!(config.default_stage_filter, StageFilter::All);
        assert_eq!(config.default_role, Role::Staff);
        assert!(env.base_path.join("tracker_config.yaml").exists());
    }

    #[test]
    fn test_update_config_round_trips_through_yaml() {
        let env = TestEnvironment::new().unwrap();
        let repo = ConfigRepository::new(env.connection.clone());

        let mut config = repo.get_config().unwrap();
        config.default_stage_filter = StageFilter::Bucket(StageBucket::Unstageable);
        config.default_role = Role::Admin;
        config.export_directory = Some("/tmp/exports".to_string());
        repo.update_config(&config).unwrap();

        let reloaded = repo.get_config().unwrap();
        assert_eq!(reloaded.default_stage_filter, StageFilter::Bucket(StageBucket::Unstageable));
        assert_eq!(reloaded.default_role, Role::Admin);
        assert_eq!(reloaded.export_directory.as_deref(), Some("/tmp/exports"));
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let env = TestEnvironment::new().unwrap();
        std::fs::write(
            env.base_path.join("tracker_config.yaml"),
            "data_format_version: \"1.0\"\ncreated_at: x\nupdated_at: y\n",
        )
        .unwrap();

        let config = ConfigRepository::new(env.connection.clone()).get_config().unwrap();
        assert_eq!(config.default_stage_filter, StageFilter::All);
        assert!(config.export_directory.is_none());
    }
}
