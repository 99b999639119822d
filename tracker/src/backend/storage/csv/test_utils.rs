//! Test utilities: temp-directory backed storage that is removed when dropped,
//! even if the test panics.

use anyhow::Result;
use tempfile::TempDir;

use shared::WoundReport;

use super::connection::CsvConnection;

/// Test environment that provides a temporary directory and connection
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// Build a report with the identity fields, timestamp and stage label set
pub fn sample_report(
    id: &str,
    patient_name: &str,
    room_number: &str,
    site: &str,
    created_at: i64,
    stage: &str,
) -> WoundReport {
    WoundReport {
        id: id.to_string(),
        created_at,
        patient_name: patient_name.to_string(),
        room_number: room_number.to_string(),
        facility_name: "North Wing".to_string(),
        site: site.to_string(),
        stage: stage.to_string(),
        is_no_stage: false,
        week1: "2x3cm".to_string(),
        week2: String::new(),
        week3: String::new(),
        week4: String::new(),
        treatment: "Foam dressing".to_string(),
        comments: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
        }
        assert!(!base_path.exists());
        Ok(())
    }
}
