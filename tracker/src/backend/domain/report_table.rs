//! Report table domain logic for the wound tracker.
//!
//! Turns resolved reports into display rows: a formatted date, the display
//! stage bucket and label, and the most recent weekly measurement.
//!
//! ## Core Components
//!
//! - **ReportTableService**: Main service for table operations
//! - **ReportTableConfig**: Configuration for display preferences
//! - **FormattedReport**: Structured data for table display (from `shared`)

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use shared::{FormattedReport, WoundReport};

use super::wound_resolver;

/// Configuration for report table display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportTableConfig {
    pub date_format: DateFormat,
}

/// Date formatting options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DateFormat {
    MonthDayYear, // "June 13, 2025"
    ShortDate,    // "06/13/2025"
    ISO,          // "2025-06-13"
}

/// Report table service that handles all table-related presentation logic
#[derive(Clone)]
pub struct ReportTableService {
    config: ReportTableConfig,
}

impl ReportTableService {
    /// Create a new ReportTableService with default configuration
    pub fn new() -> Self {
        Self {
            config: ReportTableConfig::default(),
        }
    }

    /// Create a new ReportTableService with custom configuration
    pub fn with_config(config: ReportTableConfig) -> Self {
        Self { config }
    }

    /// Format a list of reports for table display
    pub fn format_reports_for_table(&self, reports: &[WoundReport]) -> Vec<FormattedReport> {
        reports
            .iter()
            .map(|report| self.format_single_report(report))
            .collect()
    }

    /// Format a single report for display
    pub fn format_single_report(&self, report: &WoundReport) -> FormattedReport {
        let stage_bucket = wound_resolver::classify(report);
        let stage_label = match report.stage.trim() {
            "" => stage_bucket.display_name().to_string(),
            label => label.to_string(),
        };

        FormattedReport {
            id: report.id.clone(),
            formatted_date: self.format_date(report.created_at),
            patient_name: report.patient_name.clone(),
            room_number: report.room_number.clone(),
            facility_name: report.facility_name.clone(),
            site: report.site.clone(),
            stage_bucket,
            stage_label,
            latest_measurement: self.latest_measurement(report),
            treatment: report.treatment.clone(),
        }
    }

    /// Format an epoch-millisecond timestamp (UTC) based on configuration
    pub fn format_date(&self, epoch_millis: i64) -> String {
        match Utc.timestamp_millis_opt(epoch_millis).single() {
            Some(date) => match self.config.date_format {
                DateFormat::MonthDayYear => date.format("%B %-d, %Y").to_string(),
                DateFormat::ShortDate => date.format("%m/%d/%Y").to_string(),
                DateFormat::ISO => date.format("%Y-%m-%d").to_string(),
            },
            None => epoch_millis.to_string(),
        }
    }

    /// The last non-empty weekly measurement, or "-"
    pub fn latest_measurement(&self, report: &WoundReport) -> String {
        report
            .measurements()
            .iter()
            .rev()
            .map(|m| m.trim())
            .find(|m| !m.is_empty())
            .unwrap_or("-")
            .to_string()
    }
}

impl Default for ReportTableService {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ReportTableConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::MonthDayYear,
        }
    }
}
