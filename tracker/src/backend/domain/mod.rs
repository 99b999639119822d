//! # Domain Module
//!
//! Contains all business logic for the wound tracker.
//!
//! Services here are independent of any UI framework and work with any
//! storage backend implementing the storage traits.
//!
//! ## Module Organization
//!
//! - **wound_resolver**: Deduplication, ordering and filtering of report snapshots
//! - **report_service**: Report CRUD, follow-up snapshots and wound history
//! - **report_table**: Report table formatting and display logic
//! - **dashboard_service**: Stage tiles, chart series and facility counts
//! - **export_service**: CSV export of the resolved list
//! - **view_state**: Front-end state transitioned by actions
//!
//! ## Core Concepts
//!
//! - **Snapshot**: One stored report; a wound accumulates snapshots over time
//! - **Wound identity**: Patient name, room number and site, compared
//!   case-insensitively after trimming
//! - **Resolved list**: The newest snapshot per wound, newest first, after
//!   search and stage filtering
//!
//! ## Business Rules
//!
//! - Patient name, room number and site are required
//! - The store keeps every snapshot; only the resolver hides superseded ones
//! - Aggregates are computed from the resolved list, never the raw store
//! - Only admins may delete reports

pub mod commands;
pub mod dashboard_service;
pub mod export_service;
pub mod models;
pub mod report_service;
pub mod report_table;
pub mod view_state;
pub mod wound_resolver;

pub use dashboard_service::DashboardService;
pub use export_service::ExportService;
pub use models::{ReportError, WoundIdentity};
pub use report_service::ReportService;
pub use report_table::{DateFormat, ReportTableConfig, ReportTableService};
pub use view_state::{reduce, Tab, ViewAction, ViewState};
