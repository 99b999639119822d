//! Dashboard aggregates: stage tiles, the stage chart series and per
//! facility wound counts. Everything is computed from an already resolved
//! list so superseded snapshots never inflate the numbers.

use log::debug;
use std::collections::HashMap;

use shared::{ChartDataPoint, DashboardSummary, FacilityCount, StageBucket, WoundReport};

use super::wound_resolver;

#[derive(Clone, Default)]
pub struct DashboardService {}

impl DashboardService {
    pub fn new() -> Self {
        Self {}
    }

    pub fn summarize(&self, resolved: &[WoundReport]) -> DashboardSummary {
        let summary = DashboardSummary {
            tiles: wound_resolver::stage_counts(resolved),
            stage_series: self.stage_series(resolved),
            facilities: self.facility_counts(resolved),
        };
        debug!(
            "Dashboard summary: {} wounds across {} facilities",
            summary.tiles.all,
            summary.facilities.len()
        );
        summary
    }

    /// One point per display bucket, in fixed bucket order, zeros included
    pub fn stage_series(&self, resolved: &[WoundReport]) -> Vec<ChartDataPoint> {
        let mut counts: HashMap<StageBucket, usize> = HashMap::new();
        for report in resolved {
            *counts.entry(wound_resolver::classify(report)).or_insert(0) += 1;
        }

        StageBucket::ALL
            .iter()
            .map(|bucket| ChartDataPoint {
                label: bucket.display_name().to_string(),
                value: counts.get(bucket).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Wounds per facility, largest first; blank facility names are grouped
    pub fn facility_counts(&self, resolved: &[WoundReport]) -> Vec<FacilityCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for report in resolved {
            let name = match report.facility_name.trim() {
                "" => "Unspecified".to_string(),
                name => name.to_string(),
            };
            *counts.entry(name).or_insert(0) += 1;
        }

        let mut facilities: Vec<FacilityCount> = counts
            .into_iter()
            .map(|(facility_name, wound_count)| FacilityCount {
                facility_name,
                wound_count,
            })
            .collect();
        facilities.sort_by(|a, b| {
            b.wound_count
                .cmp(&a.wound_count)
                .then_with(|| a.facility_name.cmp(&b.facility_name))
        });
        facilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::sample_report;
    use shared::StageFilter;

    fn with_facility(mut report: WoundReport, facility: &str) -> WoundReport {
        report.facility_name = facility.to_string();
        report
    }

    #[test]
    fn test_stage_series_has_every_bucket_in_order() {
        let resolved = vec![
            sample_report("a", "A", "1", "Heel", 3, "Stage III"),
            sample_report("b", "B", "1", "Heel", 2, "Stage IV"),
            sample_report("c", "C", "1", "Heel", 1, "bruise"),
        ];

        let series = DashboardService::new().stage_series(&resolved);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Stage 1", "Stage 2", "Stage 3", "Stage 4", "Unstageable", "Non-staged"]
        );
        let values: Vec<usize> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0, 0, 1, 1, 0, 1]);
    }

    #[test]
    fn test_facility_counts_sorted_by_count_then_name() {
        let resolved = vec![
            with_facility(sample_report("a", "A", "1", "Heel", 1, "Stage 1"), "South"),
            with_facility(sample_report("b", "B", "1", "Heel", 1, "Stage 1"), "North"),
            with_facility(sample_report("c", "C", "1", "Heel", 1, "Stage 1"), "North"),
            with_facility(sample_report("d", "D", "1", "Heel", 1, "Stage 1"), " "),
        ];

        let facilities = DashboardService::new().facility_counts(&resolved);
        assert_eq!(facilities[0].facility_name, "North");
        assert_eq!(facilities[0].wound_count, 2);
        assert_eq!(facilities[1].facility_name, "South");
        assert_eq!(facilities[2].facility_name, "Unspecified");
    }

    #[test]
    fn test_summary_tiles_match_resolver_counts() {
        let all = vec![
            sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2"),
            sample_report("b", "Jane Doe", "4B", "Heel", 200, "Stage 3"),
        ];
        let resolved = wound_resolver::resolve(&all, "", StageFilter::All);

        let summary = DashboardService::new().summarize(&resolved);
        assert_eq!(summary.tiles.all, 1);
        assert_eq!(summary.tiles.stage3, 1);
        assert_eq!(summary.tiles.stage2, 0);
        assert_eq!(summary.facilities.len(), 1);
    }
}
