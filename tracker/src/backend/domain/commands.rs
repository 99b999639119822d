//! Domain-level command and query types
//! These structs are used by services inside the domain layer. Front ends map
//! the public DTOs defined in the `shared` crate to these internal types.

pub mod reports {
    use shared::{
        CreateReportRequest, ReportListRequest, ReportListResponse, Role, StageFilter,
        WoundObservation, WoundReport,
    };

    /// Input for recording a brand new wound.
    #[derive(Debug, Clone)]
    pub struct CreateReportCommand {
        pub patient_name: String,
        pub room_number: String,
        pub site: String,
        pub observation: WoundObservation,
    }

    /// Input for a new snapshot of an already tracked wound.
    #[derive(Debug, Clone)]
    pub struct RecordFollowupCommand {
        /// Any snapshot of the wound; its identity fields are reused
        pub report_id: String,
        pub observation: WoundObservation,
    }

    /// Whole-record replacement of one snapshot.
    #[derive(Debug, Clone)]
    pub struct UpdateReportCommand {
        pub report_id: String,
        pub patient_name: String,
        pub room_number: String,
        pub site: String,
        pub observation: WoundObservation,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteReportCommand {
        pub report_id: String,
        pub role: Role,
    }

    /// Query parameters for the resolved report list.
    #[derive(Debug, Clone, Default)]
    pub struct ReportListQuery {
        pub search_query: String,
        pub stage_filter: StageFilter,
    }

    #[derive(Debug, Clone)]
    pub struct CreateReportResult {
        pub report: WoundReport,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateReportResult {
        pub report: WoundReport,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteReportResult {
        pub deleted: bool,
        pub success_message: String,
    }

    /// Result of listing resolved reports.
    #[derive(Debug, Clone)]
    pub struct ReportListResult {
        pub reports: Vec<WoundReport>,
        pub total_snapshots: usize,
    }

    impl From<CreateReportRequest> for CreateReportCommand {
        fn from(request: CreateReportRequest) -> Self {
            Self {
                patient_name: request.patient_name,
                room_number: request.room_number,
                site: request.site,
                observation: request.observation,
            }
        }
    }

    impl From<ReportListRequest> for ReportListQuery {
        fn from(request: ReportListRequest) -> Self {
            Self {
                search_query: request.search_query,
                stage_filter: request.stage_filter,
            }
        }
    }

    impl From<ReportListResult> for ReportListResponse {
        fn from(result: ReportListResult) -> Self {
            Self {
                reports: result.reports,
                total_snapshots: result.total_snapshots,
            }
        }
    }
}
