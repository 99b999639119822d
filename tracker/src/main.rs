use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::error;
use std::path::PathBuf;

use shared::{
    CreateReportRequest, ExportReportsRequest, ReportListRequest, ReportListResponse, Role,
    StageFilter, WoundObservation, WoundReport,
};
use wound_tracker::backend::domain::commands::reports::{
    DeleteReportCommand, RecordFollowupCommand, ReportListQuery, UpdateReportCommand,
};
use wound_tracker::backend::domain::wound_resolver;
use wound_tracker::backend::storage::ConfigStorage;
use wound_tracker::backend::Backend;

#[derive(Parser)]
#[command(name = "wound-tracker")]
#[command(about = "Pressure-ulcer wound tracker")]
struct Cli {
    /// Data directory (defaults to $WOUND_TRACKER_DATA_DIR, then ~/Documents/Wound Tracker)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current report for every wound
    List {
        /// Case-insensitive text matched against name, room, facility and site
        #[arg(long, default_value = "")]
        search: String,
        /// all, staged, none, 1, 2, 3, 4 or unstageable
        #[arg(long)]
        stage: Option<StageFilter>,
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single stored report
    Show {
        /// Report ID
        id: String,
    },
    /// Show every snapshot of the wound a report belongs to
    History {
        /// Report ID
        id: String,
    },
    /// Record a new wound
    Add {
        /// Patient name
        patient_name: String,
        /// Room number
        room_number: String,
        /// Anatomical site
        site: String,
        #[command(flatten)]
        observation: ObservationArgs,
    },
    /// Record a follow-up snapshot for an existing wound
    Followup {
        /// ID of any report of the wound
        id: String,
        #[command(flatten)]
        observation: ObservationArgs,
    },
    /// Replace a stored report
    Update {
        /// Report ID
        id: String,
        /// Patient name
        patient_name: String,
        /// Room number
        room_number: String,
        /// Anatomical site
        site: String,
        #[command(flatten)]
        observation: ObservationArgs,
    },
    /// Delete a stored report (admin only)
    Delete {
        /// Report ID
        id: String,
        /// admin or staff
        #[arg(long)]
        role: Option<Role>,
    },
    /// Stage tile counts
    Counts,
    /// Stage chart series and wounds per facility
    Chart {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the current reports as CSV
    Export {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        stage: Option<StageFilter>,
        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Args)]
struct ObservationArgs {
    #[arg(long, default_value = "")]
    facility: String,
    /// Free-text stage, e.g. "Stage II" or "Unstageable"
    #[arg(long, default_value = "")]
    stage: String,
    /// Flag the wound as not a pressure ulcer
    #[arg(long)]
    no_stage: bool,
    #[arg(long, default_value = "")]
    week1: String,
    #[arg(long, default_value = "")]
    week2: String,
    #[arg(long, default_value = "")]
    week3: String,
    #[arg(long, default_value = "")]
    week4: String,
    #[arg(long, default_value = "")]
    treatment: String,
    #[arg(long, default_value = "")]
    comments: String,
}

impl From<ObservationArgs> for WoundObservation {
    fn from(args: ObservationArgs) -> Self {
        WoundObservation {
            facility_name: args.facility,
            stage: args.stage,
            is_no_stage: args.no_stage,
            week1: args.week1,
            week2: args.week2,
            week3: args.week3,
            week4: args.week4,
            treatment: args.treatment,
            comments: args.comments,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let backend = Backend::new(cli.data_dir)?;
    let config = backend.config_repository.get_config()?;

    match cli.command {
        Commands::List { search, stage, json } => {
            let request = ReportListRequest {
                search_query: search,
                stage_filter: stage.unwrap_or(config.default_stage_filter),
            };
            let listed = backend.report_service.list_resolved(request.into())?;
            if json {
                let response = ReportListResponse::from(listed);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else if listed.reports.is_empty() {
                println!("No reports found.");
            } else {
                for row in backend
                    .report_table_service
                    .format_reports_for_table(&listed.reports)
                {
                    println!(
                        "{} | {} | {} | room {} | {} | {} | {} | {} | {}",
                        row.id,
                        row.formatted_date,
                        row.patient_name,
                        row.room_number,
                        row.facility_name,
                        row.site,
                        row.stage_label,
                        row.latest_measurement,
                        row.treatment
                    );
                }
                println!(
                    "{} wounds ({} stored snapshots)",
                    listed.reports.len(),
                    listed.total_snapshots
                );
            }
        }
        Commands::Show { id } => match backend.report_service.get_report(&id)? {
            Some(report) => print_report(&backend, &report),
            None => println!("Report {} not found.", id),
        },
        Commands::History { id } => {
            for report in backend.report_service.wound_history(&id)? {
                print_report(&backend, &report);
                println!();
            }
        }
        Commands::Add {
            patient_name,
            room_number,
            site,
            observation,
        } => {
            let request = CreateReportRequest {
                patient_name,
                room_number,
                site,
                observation: observation.into(),
            };
            let result = backend.report_service.create_report(request.into())?;
            println!("Created report {}", result.report.id);
        }
        Commands::Followup { id, observation } => {
            let result = backend.report_service.record_followup(RecordFollowupCommand {
                report_id: id,
                observation: observation.into(),
            })?;
            println!("Recorded follow-up {}", result.report.id);
        }
        Commands::Update {
            id,
            patient_name,
            room_number,
            site,
            observation,
        } => {
            let result = backend.report_service.update_report(UpdateReportCommand {
                report_id: id,
                patient_name,
                room_number,
                site,
                observation: observation.into(),
            })?;
            println!("Updated report {}", result.report.id);
        }
        Commands::Delete { id, role } => {
            let result = backend.report_service.delete_report(DeleteReportCommand {
                report_id: id,
                role: role.unwrap_or(config.default_role),
            })?;
            println!("{}", result.success_message);
        }
        Commands::Counts => {
            let resolved = backend
                .report_service
                .list_resolved(ReportListQuery::default())?
                .reports;
            for filter in StageFilter::TILES {
                println!(
                    "{:<12} {}",
                    filter.to_string(),
                    wound_resolver::count_by_stage(&resolved, filter)
                );
            }
        }
        Commands::Chart { json } => {
            let resolved = backend
                .report_service
                .list_resolved(ReportListQuery::default())?
                .reports;
            let summary = backend.dashboard_service.summarize(&resolved);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }
            for point in summary.stage_series {
                println!("{:<12} {:>4} {}", point.label, point.value, "#".repeat(point.value));
            }
            println!();
            for facility in summary.facilities {
                println!("{:<24} {:>4}", facility.facility_name, facility.wound_count);
            }
        }
        Commands::Export { search, stage, out } => {
            let response = backend.export_service.export_to_path(
                ExportReportsRequest {
                    search_query: search,
                    stage_filter: stage.unwrap_or(config.default_stage_filter),
                },
                out,
                config.export_directory.clone(),
                &backend.report_service,
            )?;
            println!("{}", response.message);
        }
    }

    Ok(())
}

fn print_report(backend: &Backend, report: &WoundReport) {
    let row = backend.report_table_service.format_single_report(report);
    println!("ID:         {}", report.id);
    println!("Date:       {}", row.formatted_date);
    println!("Patient:    {} (room {})", report.patient_name, report.room_number);
    println!("Facility:   {}", report.facility_name);
    println!("Site:       {}", report.site);
    println!("Stage:      {} [{}]", row.stage_label, row.stage_bucket);
    for (week, measurement) in report.measurements().iter().enumerate() {
        if !measurement.trim().is_empty() {
            println!("Week {}:     {}", week + 1, measurement);
        }
    }
    println!("Treatment:  {}", report.treatment);
    if !report.comments.trim().is_empty() {
        println!("Comments:   {}", report.comments);
    }
}
