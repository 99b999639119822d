//! Domain model for the logical identity of a physical wound.
use shared::WoundReport;

/// The (patient name, room number, site) triple, trimmed and lowercased.
///
/// Every snapshot of the same physical wound shares one identity; the
/// resolver keeps only the newest snapshot per identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WoundIdentity {
    pub patient_name: String,
    pub room_number: String,
    pub site: String,
}

impl WoundIdentity {
    pub fn new(patient_name: &str, room_number: &str, site: &str) -> Self {
        Self {
            patient_name: normalize(patient_name),
            room_number: normalize(room_number),
            site: normalize(site),
        }
    }

    pub fn of(report: &WoundReport) -> Self {
        Self::new(&report.patient_name, &report.room_number, &report.site)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
