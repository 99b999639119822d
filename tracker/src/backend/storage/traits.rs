//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use shared::WoundReport;

use super::csv::TrackerConfig;

/// Trait defining the interface for wound report storage operations
///
/// The store never deduplicates: every snapshot stays retrievable so the
/// history of a wound can be audited. Deduplication belongs to the resolver.
pub trait ReportStorage: Send + Sync {
    /// Store a new report snapshot
    fn store_report(&self, report: &WoundReport) -> Result<()>;

    /// Retrieve a specific report by ID
    fn get_report(&self, report_id: &str) -> Result<Option<WoundReport>>;

    /// Return every stored snapshot, in file order (no pagination)
    fn list_reports(&self) -> Result<Vec<WoundReport>>;

    /// Replace an existing report as a whole
    /// Returns true if a report with the same ID was found and replaced
    fn update_report(&self, report: &WoundReport) -> Result<bool>;

    /// Delete a single report
    /// Returns true if the report was found and deleted, false otherwise
    fn delete_report(&self, report_id: &str) -> Result<bool>;
}

/// Trait defining the interface for tracker configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Get the configuration, creating the default file if missing
    fn get_config(&self) -> Result<TrackerConfig>;

    /// Persist an updated configuration
    fn update_config(&self, config: &TrackerConfig) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the domain layer works
/// with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of ReportStorage this connection creates
    type ReportRepository: ReportStorage + Clone;

    /// Create a new report repository for this connection
    fn create_report_repository(&self) -> Self::ReportRepository;
}
