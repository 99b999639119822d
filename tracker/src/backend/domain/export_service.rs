//! Export service domain logic for the wound tracker.
//!
//! Exports the resolved report list, optionally narrowed by search text and a
//! stage filter, as CSV. Rendering to other document formats is left to
//! whatever consumes the CSV.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use csv::Writer;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use shared::{ExportReportsRequest, ExportReportsResponse, ExportToPathResponse, WoundReport};

use crate::backend::domain::commands::reports::ReportListQuery;
use crate::backend::domain::report_service::ReportService;
use crate::backend::domain::wound_resolver;
use crate::backend::storage::Connection;

const EXPORT_HEADER: [&str; 14] = [
    "report_id",
    "report_date",
    "patient_name",
    "room_number",
    "facility_name",
    "site",
    "stage_bucket",
    "stage_label",
    "week1",
    "week2",
    "week3",
    "week4",
    "treatment",
    "comments",
];

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Resolve the store with the request's filters and render it as CSV
    pub fn export_reports_csv<C: Connection>(
        &self,
        request: ExportReportsRequest,
        report_service: &ReportService<C>,
    ) -> Result<ExportReportsResponse> {
        info!(
            "EXPORT: Exporting reports (search={:?}, stage={})",
            request.search_query, request.stage_filter
        );

        let listed = report_service.list_resolved(ReportListQuery {
            search_query: request.search_query.clone(),
            stage_filter: request.stage_filter,
        })?;

        if listed.reports.is_empty() {
            info!("EXPORT: No records match filter '{}'", request.stage_filter);
            return Ok(ExportReportsResponse {
                success: false,
                message: format!("No records match filter '{}'", request.stage_filter),
                csv_content: String::new(),
                filename: String::new(),
                report_count: 0,
            });
        }

        let csv_content = self.render_csv(&listed.reports)?;
        let filename = format!(
            "wound_report_{}_{}.csv",
            request.stage_filter,
            Utc::now().format("%Y%m%d")
        );

        info!(
            "EXPORT: Generated {} bytes for {} reports as {}",
            csv_content.len(),
            listed.reports.len(),
            filename
        );

        Ok(ExportReportsResponse {
            success: true,
            message: format!("Exported {} reports", listed.reports.len()),
            csv_content,
            filename,
            report_count: listed.reports.len(),
        })
    }

    /// Render already resolved reports as CSV text
    pub fn render_csv(&self, reports: &[WoundReport]) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;

        for report in reports {
            let date = Utc
                .timestamp_millis_opt(report.created_at)
                .single()
                .map(|d| d.format("%Y/%m/%d").to_string())
                .unwrap_or_default();
            let bucket = wound_resolver::classify(report);

            writer.write_record([
                report.id.as_str(),
                date.as_str(),
                report.patient_name.as_str(),
                report.room_number.as_str(),
                report.facility_name.as_str(),
                report.site.as_str(),
                bucket.as_str(),
                report.stage.as_str(),
                report.week1.as_str(),
                report.week2.as_str(),
                report.week3.as_str(),
                report.week4.as_str(),
                report.treatment.as_str(),
                report.comments.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Export into a directory: the custom path if given, else the configured
    /// export directory, else the documents directory
    pub fn export_to_path<C: Connection>(
        &self,
        request: ExportReportsRequest,
        custom_path: Option<String>,
        configured_dir: Option<String>,
        report_service: &ReportService<C>,
    ) -> Result<ExportToPathResponse> {
        let export_response = self.export_reports_csv(request, report_service)?;
        if !export_response.success {
            return Ok(ExportToPathResponse {
                success: false,
                message: export_response.message,
                file_path: String::new(),
                report_count: 0,
            });
        }

        let non_blank = |path: &String| !path.trim().is_empty();
        let export_dir = match custom_path
            .filter(non_blank)
            .or_else(|| configured_dir.filter(non_blank))
        {
            Some(path) => PathBuf::from(self.sanitize_path(&path)),
            None => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("EXPORT: Could not determine default export directory");
                    return Ok(ExportToPathResponse {
                        success: false,
                        message: "Failed to determine export directory".to_string(),
                        file_path: String::new(),
                        report_count: 0,
                    });
                }
            },
        };

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            return Ok(ExportToPathResponse {
                success: false,
                message: format!("Failed to create export directory: {}", e),
                file_path: export_dir.to_string_lossy().to_string(),
                report_count: 0,
            });
        }

        let file_path = export_dir.join(&export_response.filename);
        let file_path_str = file_path.to_string_lossy().to_string();
        match fs::write(&file_path, &export_response.csv_content) {
            Ok(_) => {
                info!(
                    "EXPORT: Wrote {} reports to {}",
                    export_response.report_count, file_path_str
                );
                Ok(ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    report_count: export_response.report_count,
                })
            }
            Err(e) => {
                error!("EXPORT: Failed to write export file to {:?}: {}", file_path, e);
                Ok(ExportToPathResponse {
                    success: false,
                    message: format!("Failed to write export file: {}", e),
                    file_path: file_path_str,
                    report_count: 0,
                })
            }
        }
    }

    /// Basic path sanitization to handle common user input issues
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        if cleaned.len() >= 2
            && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
                || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
        {
            cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
        }

        cleaned = cleaned.replace("\\ ", " ");

        while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
            cleaned.pop();
        }

        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                cleaned = home.to_string_lossy().to_string();
            } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
            }
        }

        cleaned
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}
