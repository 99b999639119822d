//! # CSV Report Repository
//!
//! Stores every wound report snapshot in `{data_directory}/wound_reports.csv`.
//! Updates and deletes rewrite the whole file through a temp file followed by
//! a rename, so a crash mid-write never leaves a half-written CSV behind.

use anyhow::{Context, Result};
use csv::{Reader, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use shared::WoundReport;

use super::connection::CsvConnection;
use crate::backend::storage::traits::ReportStorage;

/// Column order of the reports file
pub const REPORT_HEADER: [&str; 14] = [
    "id",
    "created_at",
    "patient_name",
    "room_number",
    "facility_name",
    "site",
    "stage",
    "is_no_stage",
    "week1",
    "week2",
    "week3",
    "week4",
    "treatment",
    "comments",
];

/// CSV record structure; missing text columns read back as empty strings
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReportRecord {
    id: String,
    created_at: i64,
    #[serde(default)]
    patient_name: String,
    #[serde(default)]
    room_number: String,
    #[serde(default)]
    facility_name: String,
    #[serde(default)]
    site: String,
    #[serde(default)]
    stage: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    is_no_stage: bool,
    #[serde(default)]
    week1: String,
    #[serde(default)]
    week2: String,
    #[serde(default)]
    week3: String,
    #[serde(default)]
    week4: String,
    #[serde(default)]
    treatment: String,
    #[serde(default)]
    comments: String,
}

/// Boolean cell that tolerates spreadsheet edits; an empty cell is `false`
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "invalid is_no_stage value '{}'",
            other
        ))),
    }
}

impl From<ReportRecord> for WoundReport {
    fn from(record: ReportRecord) -> Self {
        WoundReport {
            id: record.id,
            created_at: record.created_at,
            patient_name: record.patient_name,
            room_number: record.room_number,
            facility_name: record.facility_name,
            site: record.site,
            stage: record.stage,
            is_no_stage: record.is_no_stage,
            week1: record.week1,
            week2: record.week2,
            week3: record.week3,
            week4: record.week4,
            treatment: record.treatment,
            comments: record.comments,
        }
    }
}

impl From<&WoundReport> for ReportRecord {
    fn from(report: &WoundReport) -> Self {
        ReportRecord {
            id: report.id.clone(),
            created_at: report.created_at,
            patient_name: report.patient_name.clone(),
            room_number: report.room_number.clone(),
            facility_name: report.facility_name.clone(),
            site: report.site.clone(),
            stage: report.stage.clone(),
            is_no_stage: report.is_no_stage,
            week1: report.week1.clone(),
            week2: report.week2.clone(),
            week3: report.week3.clone(),
            week4: report.week4.clone(),
            treatment: report.treatment.clone(),
            comments: report.comments.clone(),
        }
    }
}

/// CSV-based report repository
#[derive(Clone)]
pub struct ReportRepository {
    connection: CsvConnection,
}

impl ReportRepository {
    /// Create a new CSV report repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Parse the CSV file, returning readable snapshots and a description of
    /// every row that could not be parsed
    fn load_reports(&self) -> Result<(Vec<WoundReport>, Vec<String>)> {
        let file_path = self.connection.ensure_reports_file_exists()?;
        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut reports = Vec::new();
        let mut unreadable = Vec::new();
        for (index, result) in csv_reader.deserialize::<ReportRecord>().enumerate() {
            match result {
                Ok(record) => reports.push(record.into()),
                Err(e) => unreadable.push(format!("row {}: {}", index + 1, e)),
            }
        }

        debug!(
            "Read {} reports ({} unreadable) from {}",
            reports.len(),
            unreadable.len(),
            file_path.display()
        );
        Ok((reports, unreadable))
    }

    /// Read all report snapshots, skipping unreadable rows with a warning
    fn read_reports(&self) -> Result<Vec<WoundReport>> {
        let (reports, unreadable) = self.load_reports()?;
        for problem in &unreadable {
            warn!("Skipping unreadable report {}", problem);
        }
        Ok(reports)
    }

    /// Read all report snapshots before a rewrite of the file
    ///
    /// Fails when any row is unreadable: rewriting from a partial list would
    /// drop those rows from the store.
    fn read_reports_for_rewrite(&self) -> Result<Vec<WoundReport>> {
        let (reports, unreadable) = self.load_reports()?;
        if !unreadable.is_empty() {
            let file_path = self.connection.reports_file_path()?;
            return Err(anyhow::anyhow!(unreadable.join("; ")).context(format!(
                "Refusing to rewrite {}: {} unreadable row(s) must be fixed first",
                file_path.display(),
                unreadable.len()
            )));
        }
        Ok(reports)
    }

    /// Write all report snapshots to the CSV file atomically
    fn write_reports(&self, reports: &[WoundReport]) -> Result<()> {
        let file_path = self.connection.ensure_reports_file_exists()?;
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to open {}", temp_path.display()))?;

            let mut csv_writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            csv_writer.write_record(REPORT_HEADER)?;
            for report in reports {
                csv_writer.serialize(ReportRecord::from(report))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)
            .with_context(|| format!("Failed to replace {}", file_path.display()))?;

        debug!("Wrote {} reports to {}", reports.len(), file_path.display());
        Ok(())
    }
}

impl ReportStorage for ReportRepository {
    fn store_report(&self, report: &WoundReport) -> Result<()> {
        let mut reports = self.read_reports_for_rewrite()?;
        if reports.iter().any(|r| r.id == report.id) {
            return Err(anyhow::anyhow!("Report already exists: {}", report.id));
        }
        reports.push(report.clone());
        self.write_reports(&reports)?;
        info!("Stored report {}", report.id);
        Ok(())
    }

    fn get_report(&self, report_id: &str) -> Result<Option<WoundReport>> {
        let reports = self.read_reports()?;
        Ok(reports.into_iter().find(|r| r.id == report_id))
    }

    fn list_reports(&self) -> Result<Vec<WoundReport>> {
        self.read_reports()
    }

    fn update_report(&self, report: &WoundReport) -> Result<bool> {
        let mut reports = self.read_reports_for_rewrite()?;
        match reports.iter().position(|r| r.id == report.id) {
            Some(index) => {
                reports[index] = report.clone();
                self.write_reports(&reports)?;
                info!("Updated report {}", report.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_report(&self, report_id: &str) -> Result<bool> {
        let mut reports = self.read_reports_for_rewrite()?;
        let initial_len = reports.len();
        reports.retain(|r| r.id != report_id);
        let was_deleted = reports.len() < initial_len;
        if was_deleted {
            self.write_reports(&reports)?;
            info!("Deleted report {}", report_id);
        }
        Ok(was_deleted)
    }
}
