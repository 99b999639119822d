use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::report_repository::{ReportRepository, REPORT_HEADER};
use crate::backend::storage::traits::Connection;

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "WOUND_TRACKER_DATA_DIR";

const REPORTS_FILE: &str = "wound_reports.csv";
const CONFIG_FILE: &str = "tracker_config.yaml";

/// CsvConnection manages the data directory and makes sure its files exist
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Resolve the default data directory without creating it
    ///
    /// Uses `$WOUND_TRACKER_DATA_DIR` when set, otherwise `~/Documents/Wound Tracker`.
    pub fn default_data_directory() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                info!("Using data directory from {}: {}", DATA_DIR_ENV, dir);
                return Ok(PathBuf::from(dir.trim()));
            }
        }

        let documents_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

        Ok(documents_dir.join("Wound Tracker"))
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> Result<PathBuf> {
        let base_dir = self
            .base_directory
            .lock()
            .map_err(|_| anyhow::anyhow!("Data directory lock poisoned"))?;
        Ok(base_dir.clone())
    }

    /// Get the path of the reports CSV file
    pub fn reports_file_path(&self) -> Result<PathBuf> {
        Ok(self.base_directory()?.join(REPORTS_FILE))
    }

    /// Get the path of the YAML configuration file
    pub fn config_file_path(&self) -> Result<PathBuf> {
        Ok(self.base_directory()?.join(CONFIG_FILE))
    }

    /// Ensure the reports CSV file exists with a proper header
    pub fn ensure_reports_file_exists(&self) -> Result<PathBuf> {
        let base_dir = self.base_directory()?;
        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
        }

        let file_path = base_dir.join(REPORTS_FILE);
        if !file_path.exists() {
            let header = format!("{}\n", REPORT_HEADER.join(","));
            fs::write(&file_path, header)
                .with_context(|| format!("Failed to create {}", file_path.display()))?;
            debug!("Created reports file: {}", file_path.display());
        }

        Ok(file_path)
    }
}

impl Connection for CsvConnection {
    type ReportRepository = ReportRepository;

    fn create_report_repository(&self) -> Self::ReportRepository {
        ReportRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let conn = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(conn.base_directory().unwrap(), nested);
    }

    #[test]
    fn test_ensure_reports_file_writes_header_once() {
        let temp_dir = TempDir::new().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();

        let path = conn.ensure_reports_file_exists().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,created_at,patient_name"));

        fs::write(&path, format!("{}extra\n", content)).unwrap();
        conn.ensure_reports_file_exists().unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("extra\n"));
    }

    #[test]
    fn test_file_paths_live_in_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();

        assert_eq!(conn.reports_file_path().unwrap(), temp_dir.path().join("wound_reports.csv"));
        assert_eq!(conn.config_file_path().unwrap(), temp_dir.path().join("tracker_config.yaml"));
    }
}
