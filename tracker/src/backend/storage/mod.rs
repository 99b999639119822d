//! # Storage Module
//!
//! Handles all data persistence for the wound tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the CSV/YAML
//! implementation in [`csv`] keeps everything in a single local data
//! directory:
//!
//! ```text
//! data/
//! ├── tracker_config.yaml
//! └── wound_reports.csv
//! ```

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{ConfigStorage, Connection, ReportStorage};
