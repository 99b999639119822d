//! Report service domain logic for the wound tracker.
//!
//! Orchestrates the report store: creating reports and follow-up snapshots,
//! whole-record updates, role-gated deletion, the per-wound history and the
//! resolved list handed to tables, dashboards and exports.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use shared::{Role, WoundObservation, WoundReport};

use crate::backend::domain::commands::reports::{
    CreateReportCommand, CreateReportResult, DeleteReportCommand, DeleteReportResult,
    RecordFollowupCommand, ReportListQuery, ReportListResult, UpdateReportCommand,
    UpdateReportResult,
};
use crate::backend::domain::models::{ReportError, WoundIdentity};
use crate::backend::domain::wound_resolver;
use crate::backend::storage::traits::{Connection, ReportStorage};

const MAX_FIELD_LEN: usize = 256;
const MAX_COMMENTS_LEN: usize = 2000;

#[derive(Clone)]
pub struct ReportService<C: Connection> {
    report_repository: C::ReportRepository,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let report_repository = connection.create_report_repository();
        Self { report_repository }
    }

    /// Record a brand new wound
    pub fn create_report(&self, command: CreateReportCommand) -> Result<CreateReportResult> {
        info!(
            "Creating report: patient={}, room={}, site={}",
            command.patient_name, command.room_number, command.site
        );

        validate_identity(&command.patient_name, &command.room_number, &command.site)?;
        validate_observation(&command.observation)?;

        let report = new_snapshot(
            &command.patient_name,
            &command.room_number,
            &command.site,
            command.observation,
            Utc::now().timestamp_millis(),
        );
        self.report_repository.store_report(&report)?;

        info!("Created report {}", report.id);
        Ok(CreateReportResult { report })
    }

    /// Record a new snapshot for the wound an existing report belongs to
    pub fn record_followup(&self, command: RecordFollowupCommand) -> Result<CreateReportResult> {
        info!("Recording follow-up for report {}", command.report_id);

        let previous = self
            .report_repository
            .get_report(&command.report_id)?
            .ok_or_else(|| ReportError::NotFound(command.report_id.clone()))?;
        validate_observation(&command.observation)?;

        // stamp after the wound's newest snapshot so the follow-up supersedes it
        let latest_created_at = self
            .snapshots_of(&WoundIdentity::of(&previous))?
            .iter()
            .map(|report| report.created_at)
            .max()
            .unwrap_or(previous.created_at);
        let created_at = Utc::now()
            .timestamp_millis()
            .max(latest_created_at.saturating_add(1));
        let report = new_snapshot(
            &previous.patient_name,
            &previous.room_number,
            &previous.site,
            command.observation,
            created_at,
        );
        self.report_repository.store_report(&report)?;

        info!("Recorded follow-up {} superseding {}", report.id, previous.id);
        Ok(CreateReportResult { report })
    }

    /// Replace a stored snapshot as a whole; ID and creation time are kept
    pub fn update_report(&self, command: UpdateReportCommand) -> Result<UpdateReportResult> {
        info!("Updating report {}", command.report_id);

        validate_identity(&command.patient_name, &command.room_number, &command.site)?;
        validate_observation(&command.observation)?;

        let existing = self
            .report_repository
            .get_report(&command.report_id)?
            .ok_or_else(|| ReportError::NotFound(command.report_id.clone()))?;

        let mut report = WoundReport {
            patient_name: command.patient_name.trim().to_string(),
            room_number: command.room_number.trim().to_string(),
            site: command.site.trim().to_string(),
            ..existing
        };
        report.apply_observation(command.observation);

        if !self.report_repository.update_report(&report)? {
            return Err(ReportError::NotFound(command.report_id).into());
        }

        info!("Updated report {}", report.id);
        Ok(UpdateReportResult { report })
    }

    /// Delete a snapshot; only admins may delete
    pub fn delete_report(&self, command: DeleteReportCommand) -> Result<DeleteReportResult> {
        info!("Deleting report {} as {:?}", command.report_id, command.role);

        if command.role != Role::Admin {
            warn!("Rejected delete of report {} by {:?}", command.report_id, command.role);
            return Err(ReportError::Unauthorized {
                role: format!("{:?}", command.role).to_lowercase(),
                action: "delete reports".to_string(),
            }
            .into());
        }

        let deleted = self.report_repository.delete_report(&command.report_id)?;
        let success_message = if deleted {
            format!("Deleted report {}", command.report_id)
        } else {
            warn!("Report {} not found for deletion", command.report_id);
            format!("Report {} was not found", command.report_id)
        };

        Ok(DeleteReportResult {
            deleted,
            success_message,
        })
    }

    pub fn get_report(&self, report_id: &str) -> Result<Option<WoundReport>> {
        self.report_repository.get_report(report_id)
    }

    /// Every stored snapshot, superseded ones included
    pub fn get_all_reports(&self) -> Result<Vec<WoundReport>> {
        self.report_repository.list_reports()
    }

    /// Every snapshot of the wound the given report belongs to, oldest first
    pub fn wound_history(&self, report_id: &str) -> Result<Vec<WoundReport>> {
        let anchor = self
            .report_repository
            .get_report(report_id)?
            .ok_or_else(|| ReportError::NotFound(report_id.to_string()))?;
        let mut history = self.snapshots_of(&WoundIdentity::of(&anchor))?;
        history.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        info!("Found {} snapshots for wound of report {}", history.len(), report_id);
        Ok(history)
    }

    fn snapshots_of(&self, identity: &WoundIdentity) -> Result<Vec<WoundReport>> {
        Ok(self
            .report_repository
            .list_reports()?
            .into_iter()
            .filter(|report| WoundIdentity::of(report) == *identity)
            .collect())
    }

    /// Read the whole store and resolve it
    pub fn list_resolved(&self, query: ReportListQuery) -> Result<ReportListResult> {
        let all_reports = self.report_repository.list_reports()?;
        let reports =
            wound_resolver::resolve(&all_reports, &query.search_query, query.stage_filter);

        info!(
            "Resolved {} snapshots to {} reports (search={:?}, stage={})",
            all_reports.len(),
            reports.len(),
            query.search_query,
            query.stage_filter
        );

        Ok(ReportListResult {
            reports,
            total_snapshots: all_reports.len(),
        })
    }
}

fn new_snapshot(
    patient_name: &str,
    room_number: &str,
    site: &str,
    observation: WoundObservation,
    created_at: i64,
) -> WoundReport {
    let suffix = uuid::Uuid::new_v4().simple().to_string();

    let mut report = WoundReport {
        id: WoundReport::generate_id(created_at, &suffix[..8]),
        created_at,
        patient_name: patient_name.trim().to_string(),
        room_number: room_number.trim().to_string(),
        facility_name: String::new(),
        site: site.trim().to_string(),
        stage: String::new(),
        is_no_stage: false,
        week1: String::new(),
        week2: String::new(),
        week3: String::new(),
        week4: String::new(),
        treatment: String::new(),
        comments: String::new(),
    };
    report.apply_observation(observation);
    report
}

fn validate_identity(patient_name: &str, room_number: &str, site: &str) -> Result<(), ReportError> {
    for (field, value) in [
        ("patient name", patient_name),
        ("room number", room_number),
        ("site", site),
    ] {
        if value.trim().is_empty() {
            return Err(ReportError::Validation(format!("{} cannot be empty", field)));
        }
        if value.chars().count() > MAX_FIELD_LEN {
            return Err(ReportError::Validation(format!(
                "{} cannot exceed {} characters",
                field, MAX_FIELD_LEN
            )));
        }
    }
    Ok(())
}

fn validate_observation(observation: &WoundObservation) -> Result<(), ReportError> {
    let fields = [
        ("facility name", &observation.facility_name),
        ("stage", &observation.stage),
        ("week 1", &observation.week1),
        ("week 2", &observation.week2),
        ("week 3", &observation.week3),
        ("week 4", &observation.week4),
        ("treatment", &observation.treatment),
    ];
    for (field, value) in fields {
        if value.chars().count() > MAX_FIELD_LEN {
            return Err(ReportError::Validation(format!(
                "{} cannot exceed {} characters",
                field, MAX_FIELD_LEN
            )));
        }
    }
    if observation.comments.chars().count() > MAX_COMMENTS_LEN {
        return Err(ReportError::Validation(format!(
            "comments cannot exceed {} characters",
            MAX_COMMENTS_LEN
        )));
    }
    Ok(())
}
