//! Wound record resolution: the canonical view of all stored reports.
//!
//! Given every stored snapshot, [`resolve`] collapses the history of each
//! physical wound down to its newest snapshot, keeps the ones that pass the
//! stage filter and the search query, and orders them newest first. Every
//! function here is pure: inputs are borrowed, never mutated, and nothing
//! can fail. Empty or odd text fields simply do not match.
//!
//! ## Stage classification
//!
//! Stages come from a free-text label, matched case-insensitively by
//! substring:
//!
//! | bucket      | label contains                                        |
//! |-------------|-------------------------------------------------------|
//! | 1           | `stage 1`, or `stage i` without `ii` anywhere         |
//! | 2           | `stage 2` or `stage ii`                               |
//! | 3           | `stage 3` or `stage iii`                              |
//! | 4           | `stage 4` or `stage iv`                               |
//! | unstageable | `unstageable`                                         |
//!
//! The rules are independent, so one label can satisfy several of them:
//! `Stage IV` satisfies 1 and 4, `Stage III` satisfies 2 and 3. Exact bucket
//! filters keep that overlap; [`classify`] picks a single display bucket by
//! checking the highest stage first.

use std::collections::HashMap;

use shared::{StageBucket, StageCounts, StageFilter, WoundReport};

use super::models::WoundIdentity;

/// Which stage rules a label satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageMatches {
    pub one: bool,
    pub two: bool,
    pub three: bool,
    pub four: bool,
    pub unstageable: bool,
}

impl StageMatches {
    pub fn of_label(label: &str) -> Self {
        let label = label.to_lowercase();
        Self {
            one: label.contains("stage 1") || (label.contains("stage i") && !label.contains("ii")),
            two: label.contains("stage 2") || label.contains("stage ii"),
            three: label.contains("stage 3") || label.contains("stage iii"),
            four: label.contains("stage 4") || label.contains("stage iv"),
            unstageable: label.contains("unstageable"),
        }
    }

    pub fn of(report: &WoundReport) -> Self {
        Self::of_label(&report.stage)
    }

    /// True when the label satisfies at least one stage rule
    pub fn any(&self) -> bool {
        self.one || self.two || self.three || self.four || self.unstageable
    }

    pub fn matches(&self, bucket: StageBucket) -> bool {
        match bucket {
            StageBucket::One => self.one,
            StageBucket::Two => self.two,
            StageBucket::Three => self.three,
            StageBucket::Four => self.four,
            StageBucket::Unstageable => self.unstageable,
            StageBucket::None => !self.any(),
        }
    }
}

/// Flagged non-staged, or no stage rule matches the label
pub fn is_non_staged(report: &WoundReport) -> bool {
    report.is_no_stage || !StageMatches::of(report).any()
}

/// Single display bucket for a report
pub fn classify(report: &WoundReport) -> StageBucket {
    if report.is_no_stage {
        return StageBucket::None;
    }

    let matches = StageMatches::of(report);
    [
        StageBucket::Unstageable,
        StageBucket::Four,
        StageBucket::Three,
        StageBucket::Two,
        StageBucket::One,
    ]
    .into_iter()
    .find(|bucket| matches.matches(*bucket))
    .unwrap_or(StageBucket::None)
}

/// Stage filter predicate
pub fn matches_stage_filter(report: &WoundReport, filter: StageFilter) -> bool {
    let matches = StageMatches::of(report);
    match filter {
        StageFilter::All => true,
        StageFilter::Staged => matches.any() && !report.is_no_stage,
        StageFilter::None | StageFilter::Bucket(StageBucket::None) => {
            report.is_no_stage || !matches.any()
        }
        StageFilter::Bucket(bucket) => !report.is_no_stage && matches.matches(bucket),
    }
}

/// Search predicate over patient name, room number, facility and site
pub fn matches_search(report: &WoundReport, search_query: &str) -> bool {
    let query = search_query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        &report.patient_name,
        &report.room_number,
        &report.facility_name,
        &report.site,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Newest first; equal timestamps fall back to the greater ID
fn is_newer(candidate: &WoundReport, current: &WoundReport) -> bool {
    (candidate.created_at, candidate.id.as_str()) > (current.created_at, current.id.as_str())
}

fn sort_newest_first(reports: &mut [WoundReport]) {
    reports.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Keep only the newest snapshot of each logical wound, newest first
pub fn deduplicate(reports: &[WoundReport]) -> Vec<WoundReport> {
    let mut latest: HashMap<WoundIdentity, &WoundReport> = HashMap::new();

    for report in reports {
        latest
            .entry(WoundIdentity::of(report))
            .and_modify(|current| {
                if is_newer(report, current) {
                    *current = report;
                }
            })
            .or_insert(report);
    }

    let mut deduplicated: Vec<WoundReport> = latest.into_values().cloned().collect();
    sort_newest_first(&mut deduplicated);
    deduplicated
}

/// Resolve the stored reports into the list shown in tables and exports
pub fn resolve(
    all_reports: &[WoundReport],
    search_query: &str,
    stage_filter: StageFilter,
) -> Vec<WoundReport> {
    deduplicate(all_reports)
        .into_iter()
        .filter(|report| matches_stage_filter(report, stage_filter))
        .filter(|report| matches_search(report, search_query))
        .collect()
}

/// Subset of an already resolved list passing a stage filter
pub fn filter_by_stage(resolved: &[WoundReport], stage_filter: StageFilter) -> Vec<WoundReport> {
    resolved
        .iter()
        .filter(|report| matches_stage_filter(report, stage_filter))
        .cloned()
        .collect()
}

/// Count of an already resolved list passing a stage filter
///
/// Pass the resolved list, never the raw store, or superseded snapshots get
/// counted twice.
pub fn count_by_stage(resolved: &[WoundReport], stage_filter: StageFilter) -> usize {
    resolved
        .iter()
        .filter(|report| matches_stage_filter(report, stage_filter))
        .count()
}

/// Every dashboard tile at once
pub fn stage_counts(resolved: &[WoundReport]) -> StageCounts {
    StageCounts {
        all: count_by_stage(resolved, StageFilter::All),
        staged: count_by_stage(resolved, StageFilter::Staged),
        none: count_by_stage(resolved, StageFilter::None),
        stage1: count_by_stage(resolved, StageFilter::Bucket(StageBucket::One)),
        stage2: count_by_stage(resolved, StageFilter::Bucket(StageBucket::Two)),
        stage3: count_by_stage(resolved, StageFilter::Bucket(StageBucket::Three)),
        stage4: count_by_stage(resolved, StageFilter::Bucket(StageBucket::Four)),
        unstageable: count_by_stage(resolved, StageFilter::Bucket(StageBucket::Unstageable)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::sample_report;

    fn staged(id: &str, created_at: i64, stage: &str) -> WoundReport {
        sample_report(id, &format!("Patient {}", id), "1A", "Sacrum", created_at, stage)
    }

    #[test]
    fn test_same_wound_keeps_latest_snapshot() {
        let a = sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2");
        let b = sample_report("b", "jane doe", "4b", "heel", 200, "Stage 3");

        let resolved = resolve(&[a, b.clone()], "", StageFilter::All);
        assert_eq!(resolved, vec![b.clone()]);
        assert_eq!(classify(&resolved[0]), StageBucket::Three);
    }

    #[test]
    fn test_latest_snapshot_wins_regardless_of_input_order() {
        let newer = sample_report("n", "Jane Doe", "4B", "Heel", 300, "Stage 4");
        let older = sample_report("o", " JANE DOE", "4B ", "Heel", 100, "Stage 1");

        let resolved = resolve(&[newer.clone(), older], "", StageFilter::All);
        assert_eq!(resolved, vec![newer]);
    }

    #[test]
    fn test_equal_timestamps_keep_greater_id() {
        let first = sample_report("report::5::aaaa", "Jane Doe", "4B", "Heel", 500, "Stage 2");
        let second = sample_report("report::5::bbbb", "Jane Doe", "4B", "Heel", 500, "Stage 3");

        assert_eq!(deduplicate(&[first.clone(), second.clone()]), vec![second.clone()]);
        assert_eq!(deduplicate(&[second.clone(), first]), vec![second]);
    }

    #[test]
    fn test_different_sites_are_different_wounds() {
        let heel = sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2");
        let sacrum = sample_report("b", "Jane Doe", "4B", "Sacrum", 50, "Stage 2");

        let resolved = resolve(&[heel.clone(), sacrum.clone()], "", StageFilter::All);
        assert_eq!(resolved, vec![heel, sacrum]);
    }

    #[test]
    fn test_output_sorted_newest_first() {
        let reports = vec![
            staged("a", 10, "Stage 1"),
            staged("b", 30, "Stage 2"),
            staged("c", 20, "Stage 3"),
            staged("d", 20, "Stage 4"),
        ];

        let ids: Vec<String> = resolve(&reports, "", StageFilter::All)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_empty_input_resolves_to_empty() {
        assert!(resolve(&[], "anything", StageFilter::Staged).is_empty());
        assert_eq!(stage_counts(&[]), StageCounts::default());
    }

    #[test]
    fn test_stage_two_label() {
        let report = staged("a", 1, "Stage 2");
        assert_eq!(classify(&report), StageBucket::Two);
        assert!(matches_stage_filter(&report, StageFilter::Bucket(StageBucket::Two)));
        assert!(matches_stage_filter(&report, StageFilter::Staged));
        assert!(!matches_stage_filter(&report, StageFilter::None));
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(classify(&staged("a", 1, "Stage I")), StageBucket::One);
        assert_eq!(classify(&staged("a", 1, "stage ii")), StageBucket::Two);
        assert_eq!(classify(&staged("a", 1, "Stage III")), StageBucket::Three);
        assert_eq!(classify(&staged("a", 1, "STAGE IV")), StageBucket::Four);
        assert_eq!(classify(&staged("a", 1, "Unstageable - eschar")), StageBucket::Unstageable);
    }

    #[test]
    fn test_stage_one_guard_against_ii() {
        let stage_two = staged("a", 1, "Stage II");
        assert!(!matches_stage_filter(&stage_two, StageFilter::Bucket(StageBucket::One)));

        let stage_three = staged("a", 1, "Stage III");
        assert!(!matches_stage_filter(&stage_three, StageFilter::Bucket(StageBucket::One)));
    }

    #[test]
    fn test_overlapping_roman_numeral_rules_are_preserved() {
        // "stage iv" contains "stage i" and no "ii"
        let stage_four = staged("a", 1, "Stage IV");
        assert!(matches_stage_filter(&stage_four, StageFilter::Bucket(StageBucket::One)));
        assert!(matches_stage_filter(&stage_four, StageFilter::Bucket(StageBucket::Four)));

        // "stage iii" contains "stage ii"
        let stage_three = staged("b", 1, "Stage III");
        assert!(matches_stage_filter(&stage_three, StageFilter::Bucket(StageBucket::Two)));
        assert!(matches_stage_filter(&stage_three, StageFilter::Bucket(StageBucket::Three)));
    }

    #[test]
    fn test_no_stage_flag_overrides_label() {
        let mut report = staged("a", 1, "Stage 2");
        report.is_no_stage = true;

        assert_eq!(classify(&report), StageBucket::None);
        assert!(is_non_staged(&report));
        assert!(matches_stage_filter(&report, StageFilter::None));
        assert!(!matches_stage_filter(&report, StageFilter::Staged));
        assert!(!matches_stage_filter(&report, StageFilter::Bucket(StageBucket::Two)));
        assert!(matches_stage_filter(&report, StageFilter::All));
    }

    #[test]
    fn test_unrecognized_or_empty_label_is_non_staged() {
        for label in ["Skin tear", "", "   ", "DTI"] {
            let report = staged("a", 1, label);
            assert_eq!(classify(&report), StageBucket::None, "label {:?}", label);
            assert!(matches_stage_filter(&report, StageFilter::None));
            assert!(!matches_stage_filter(&report, StageFilter::Staged));
        }
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut report = sample_report("a", "Jane Doe", "4B", "Heel", 1, "Stage 2");
        report.facility_name = "St. Mary's".to_string();

        assert!(matches_search(&report, "4b"));
        assert!(matches_search(&report, "JANE"));
        assert!(matches_search(&report, "heel"));
        assert!(matches_search(&report, "mary"));
        assert!(matches_search(&report, ""));
        assert!(matches_search(&report, "   "));
        assert!(matches_search(&report, "  jane "));
        assert!(!matches_search(&report, "sacrum"));
        // treatment is not searched
        assert!(!matches_search(&report, "foam"));
    }

    #[test]
    fn test_search_applies_after_deduplication() {
        let old = sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2");
        let mut new = sample_report("b", "Jane Doe", "4B", "Heel", 200, "Stage 2");
        new.facility_name = "South Wing".to_string();

        assert!(resolve(&[old.clone(), new.clone()], "north", StageFilter::All).is_empty());
        assert_eq!(resolve(&[old, new.clone()], "south", StageFilter::All), vec![new]);
    }

    #[test]
    fn test_stage_filter_applies_after_deduplication() {
        let old = sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2");
        let new = sample_report("b", "Jane Doe", "4B", "Heel", 200, "Stage 3");

        assert!(resolve(&[old.clone(), new.clone()], "", StageFilter::Bucket(StageBucket::Two)).is_empty());
        assert_eq!(
            resolve(&[old, new.clone()], "", StageFilter::Bucket(StageBucket::Three)),
            vec![new]
        );
    }

    #[test]
    fn test_resolve_does_not_mutate_input() {
        let reports = vec![
            staged("a", 10, "Stage 1"),
            sample_report("b", "Patient a", "1a", "sacrum", 5, "Stage 2"),
        ];
        let before = reports.clone();
        let _ = resolve(&reports, "patient", StageFilter::Staged);
        assert_eq!(reports, before);
    }

    #[test]
    fn test_counts_use_resolved_list() {
        let reports = vec![
            sample_report("a", "Jane Doe", "4B", "Heel", 100, "Stage 2"),
            sample_report("b", "Jane Doe", "4B", "Heel", 200, "Stage 2"),
            sample_report("c", "John Roe", "5A", "Sacrum", 150, "Unstageable"),
            sample_report("d", "Ann Poe", "6C", "Hip", 120, "Skin tear"),
        ];

        let resolved = resolve(&reports, "", StageFilter::All);
        assert_eq!(resolved.len(), 3);
        assert_eq!(count_by_stage(&resolved, StageFilter::Bucket(StageBucket::Two)), 1);
        assert_eq!(
            filter_by_stage(&resolved, StageFilter::Staged)
                .into_iter()
                .map(|r| r.id)
                .collect::<Vec<_>>(),
            vec!["b", "c"]
        );

        let counts = stage_counts(&resolved);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.staged, 2);
        assert_eq!(counts.none, 1);
        assert_eq!(counts.stage2, 1);
        assert_eq!(counts.unstageable, 1);
        assert_eq!(counts.stage1, 0);
    }

    #[test]
    fn test_tile_filters_agree_with_stage_counts() {
        let resolved = vec![
            sample_report("a", "A", "1", "Heel", 5, "Stage IV"),
            sample_report("b", "B", "1", "Heel", 4, "Stage 2"),
            sample_report("c", "C", "1", "Heel", 3, "Unstageable"),
            sample_report("d", "D", "1", "Heel", 2, "bruise"),
        ];
        let counts = stage_counts(&resolved);

        let tile_counts: Vec<usize> = StageFilter::TILES
            .iter()
            .map(|filter| count_by_stage(&resolved, *filter))
            .collect();
        assert_eq!(
            tile_counts,
            vec![
                counts.all,
                counts.staged,
                counts.none,
                counts.stage1,
                counts.stage2,
                counts.stage3,
                counts.stage4,
                counts.unstageable,
            ]
        );
        assert_eq!(tile_counts, vec![4, 3, 1, 1, 1, 0, 1, 1]);
    }
}
