use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report ID in format: "report::<epoch_millis>::<suffix>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoundReport {
    pub id: String,
    /// Creation time in epoch milliseconds, used for ordering and deduplication
    pub created_at: i64,
    pub patient_name: String,
    pub room_number: String,
    /// Facility or hospital name
    pub facility_name: String,
    /// Anatomical site, e.g. "Sacrum" or "Left heel"
    pub site: String,
    /// Free-text stage/type label as entered, e.g. "Stage II" or "Unstageable"
    pub stage: String,
    /// Explicit "non-staged" flag (e.g. skin tears, surgical wounds)
    pub is_no_stage: bool,
    pub week1: String,
    pub week2: String,
    pub week3: String,
    pub week4: String,
    pub treatment: String,
    pub comments: String,
}

/// Pressure-ulcer stage bucket a report is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageBucket {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "unstageable")]
    Unstageable,
    #[serde(rename = "none")]
    None,
}

impl StageBucket {
    /// All buckets in dashboard order
    pub const ALL: [StageBucket; 6] = [
        StageBucket::One,
        StageBucket::Two,
        StageBucket::Three,
        StageBucket::Four,
        StageBucket::Unstageable,
        StageBucket::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageBucket::One => "1",
            StageBucket::Two => "2",
            StageBucket::Three => "3",
            StageBucket::Four => "4",
            StageBucket::Unstageable => "unstageable",
            StageBucket::None => "none",
        }
    }

    /// Human readable label for tables and charts
    pub fn display_name(&self) -> &'static str {
        match self {
            StageBucket::One => "Stage 1",
            StageBucket::Two => "Stage 2",
            StageBucket::Three => "Stage 3",
            StageBucket::Four => "Stage 4",
            StageBucket::Unstageable => "Unstageable",
            StageBucket::None => "Non-staged",
        }
    }
}

impl fmt::Display for StageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage filter selected in the report list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageFilter {
    #[default]
    All,
    /// Matches any stage category and is not flagged non-staged
    Staged,
    /// Flagged non-staged or matches no category
    None,
    /// One exact stage bucket (never `StageBucket::None`, use `StageFilter::None`)
    Bucket(StageBucket),
}

impl StageFilter {
    /// Every filter with its own dashboard tile
    pub const TILES: [StageFilter; 8] = [
        StageFilter::All,
        StageFilter::Staged,
        StageFilter::None,
        StageFilter::Bucket(StageBucket::One),
        StageFilter::Bucket(StageBucket::Two),
        StageFilter::Bucket(StageBucket::Three),
        StageFilter::Bucket(StageBucket::Four),
        StageFilter::Bucket(StageBucket::Unstageable),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageFilter::All => "all",
            StageFilter::Staged => "staged",
            StageFilter::None | StageFilter::Bucket(StageBucket::None) => "none",
            StageFilter::Bucket(bucket) => bucket.as_str(),
        }
    }
}

impl fmt::Display for StageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageFilter {
    type Err = ParseStageFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(StageFilter::All),
            "staged" => Ok(StageFilter::Staged),
            "none" => Ok(StageFilter::None),
            "1" => Ok(StageFilter::Bucket(StageBucket::One)),
            "2" => Ok(StageFilter::Bucket(StageBucket::Two)),
            "3" => Ok(StageFilter::Bucket(StageBucket::Three)),
            "4" => Ok(StageFilter::Bucket(StageBucket::Four)),
            "unstageable" => Ok(StageFilter::Bucket(StageBucket::Unstageable)),
            _ => Err(ParseStageFilterError(s.to_string())),
        }
    }
}

impl Serialize for StageFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StageFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseStageFilterError(pub String);

impl fmt::Display for ParseStageFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown stage filter '{}' (expected all, staged, none, 1, 2, 3, 4 or unstageable)",
            self.0
        )
    }
}

impl std::error::Error for ParseStageFilterError {}

/// Role flag; only admins may delete reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(format!("Unknown role '{}' (expected admin or staff)", other)),
        }
    }
}

/// Clinical fields captured by the entry form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WoundObservation {
    pub facility_name: String,
    pub stage: String,
    pub is_no_stage: bool,
    pub week1: String,
    pub week2: String,
    pub week3: String,
    pub week4: String,
    pub treatment: String,
    pub comments: String,
}

/// Request to record a brand new wound report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub patient_name: String,
    pub room_number: String,
    pub site: String,
    pub observation: WoundObservation,
}

/// Request for the resolved report list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportListRequest {
    pub search_query: String,
    pub stage_filter: StageFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportListResponse {
    pub reports: Vec<WoundReport>,
    /// Number of stored snapshots before deduplication and filtering
    pub total_snapshots: usize,
}

/// Dashboard tile counts, always computed over a resolved list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageCounts {
    pub all: usize,
    pub staged: usize,
    pub none: usize,
    pub stage1: usize,
    pub stage2: usize,
    pub stage3: usize,
    pub stage4: usize,
    pub unstageable: usize,
}

/// One point in a chart data series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityCount {
    pub facility_name: String,
    pub wound_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub tiles: StageCounts,
    pub stage_series: Vec<ChartDataPoint>,
    pub facilities: Vec<FacilityCount>,
}

/// Represents a formatted report row for display purposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedReport {
    pub id: String,
    pub formatted_date: String,
    pub patient_name: String,
    pub room_number: String,
    pub facility_name: String,
    pub site: String,
    pub stage_bucket: StageBucket,
    pub stage_label: String,
    pub latest_measurement: String,
    pub treatment: String,
}

/// Request for exporting reports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportReportsRequest {
    pub search_query: String,
    pub stage_filter: StageFilter,
}

/// Response containing exported CSV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReportsResponse {
    pub success: bool,
    pub message: String,
    pub csv_content: String,
    pub filename: String,
    pub report_count: usize,
}

/// Response after writing an export to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub report_count: usize,
}

impl WoundReport {
    /// Generate a report ID from the creation timestamp and a random suffix
    pub fn generate_id(epoch_millis: i64, suffix: &str) -> String {
        format!("report::{}::{}", epoch_millis, suffix)
    }

    /// Parse a report ID to extract its creation timestamp
    pub fn parse_id(id: &str) -> Result<i64, ReportIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "report" || parts[2].is_empty() {
            return Err(ReportIdError::InvalidFormat);
        }

        parts[1]
            .parse::<i64>()
            .map_err(|_| ReportIdError::InvalidTimestamp)
    }

    /// Take the clinical fields of an observation, keeping identity and id
    pub fn apply_observation(&mut self, observation: WoundObservation) {
        self.facility_name = observation.facility_name;
        self.stage = observation.stage;
        self.is_no_stage = observation.is_no_stage;
        self.week1 = observation.week1;
        self.week2 = observation.week2;
        self.week3 = observation.week3;
        self.week4 = observation.week4;
        self.treatment = observation.treatment;
        self.comments = observation.comments;
    }

    /// Weekly measurements in entry order
    pub fn measurements(&self) -> [&str; 4] {
        [&self.week1, &self.week2, &self.week3, &self.week4]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for ReportIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportIdError::InvalidFormat => write!(f, "Invalid report ID format"),
            ReportIdError::InvalidTimestamp => write!(f, "Invalid timestamp in report ID"),
        }
    }
}

impl std::error::Error for ReportIdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_parse_report_id() {
        let id = WoundReport::generate_id(1702516122000, "af3c9e01");
        assert_eq!(id, "report::1702516122000::af3c9e01");
        assert_eq!(WoundReport::parse_id(&id).unwrap(), 1702516122000);

        assert_eq!(WoundReport::parse_id("report::123"), Err(ReportIdError::InvalidFormat));
        assert_eq!(WoundReport::parse_id("child::123::abc"), Err(ReportIdError::InvalidFormat));
        assert_eq!(
            WoundReport::parse_id("report::soon::abc"),
            Err(ReportIdError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_stage_filter_parsing() {
        assert_eq!("all".parse::<StageFilter>().unwrap(), StageFilter::All);
        assert_eq!(" Staged ".parse::<StageFilter>().unwrap(), StageFilter::Staged);
        assert_eq!("NONE".parse::<StageFilter>().unwrap(), StageFilter::None);
        assert_eq!(
            "3".parse::<StageFilter>().unwrap(),
            StageFilter::Bucket(StageBucket::Three)
        );
        assert_eq!(
            "Unstageable".parse::<StageFilter>().unwrap(),
            StageFilter::Bucket(StageBucket::Unstageable)
        );
        assert!("5".parse::<StageFilter>().is_err());
    }

    #[test]
    fn test_stage_filter_wire_format() {
        let json = serde_json::to_string(&StageFilter::Bucket(StageBucket::Two)).unwrap();
        assert_eq!(json, "\"2\"");

        let filter: StageFilter = serde_json::from_str("\"unstageable\"").unwrap();
        assert_eq!(filter, StageFilter::Bucket(StageBucket::Unstageable));

        assert!(serde_json::from_str::<StageFilter>("\"stage 9\"").is_err());
    }

    #[test]
    fn test_stage_bucket_names() {
        assert_eq!(StageBucket::Four.as_str(), "4");
        assert_eq!(StageBucket::None.display_name(), "Non-staged");
        assert_eq!(serde_json::to_string(&StageBucket::Unstageable).unwrap(), "\"unstageable\"");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("nurse".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Staff);
    }

    #[test]
    fn test_apply_observation_keeps_identity() {
        let mut report = WoundReport {
            id: "report::1::a".to_string(),
            created_at: 1,
            patient_name: "Jane Doe".to_string(),
            room_number: "4B".to_string(),
            facility_name: "North".to_string(),
            site: "Heel".to_string(),
            stage: "Stage 2".to_string(),
            is_no_stage: false,
            week1: "2x2".to_string(),
            week2: String::new(),
            week3: String::new(),
            week4: String::new(),
            treatment: "Foam".to_string(),
            comments: String::new(),
        };

        report.apply_observation(WoundObservation {
            facility_name: "South".to_string(),
            stage: "Stage 3".to_string(),
            ..Default::default()
        });

        assert_eq!(report.id, "report::1::a");
        assert_eq!(report.patient_name, "Jane Doe");
        assert_eq!(report.stage, "Stage 3");
        assert_eq!(report.facility_name, "South");
        assert_eq!(report.measurements(), ["", "", "", ""]);
    }
}
