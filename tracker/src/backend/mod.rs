//! # Backend Module
//!
//! Direct, synchronous access to the domain services and storage. The
//! command line front end drives everything through [`Backend`].

use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::csv::CsvConnection;

use storage::csv::ConfigRepository;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub report_service: domain::ReportService<CsvConnection>,
    pub dashboard_service: domain::DashboardService,
    pub report_table_service: domain::ReportTableService,
    pub export_service: domain::ExportService,
    pub config_repository: ConfigRepository,
}

impl Backend {
    /// Open the backend on `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => CsvConnection::default_data_directory()?,
        };
        info!("Opening wound tracker data in {}", data_dir.display());

        let csv_conn = Arc::new(CsvConnection::new(&data_dir)?);
        csv_conn.ensure_reports_file_exists()?;

        Ok(Backend {
            report_service: domain::ReportService::new(csv_conn.clone()),
            dashboard_service: domain::DashboardService::new(),
            report_table_service: domain::ReportTableService::new(),
            export_service: domain::ExportService::new(),
            config_repository: ConfigRepository::new((*csv_conn).clone()),
        })
    }
}
