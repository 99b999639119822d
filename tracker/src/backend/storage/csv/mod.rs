//! # CSV Storage Module
//!
//! File-based storage for the wound tracker.
//!
//! ## Features
//!
//! - One CSV file holding every report snapshot
//! - Full CRUD operations with atomic file writes (temp file + rename)
//! - YAML configuration file next to the data
//!
//! ## File Format
//!
//! ```csv
//! id,created_at,patient_name,room_number,facility_name,site,stage,is_no_stage,week1,week2,week3,week4,treatment,comments
//! report::1718000000000::9f2c1a7e,1718000000000,Jane Doe,4B,North Wing,Heel,Stage 2,false,2x3cm,,,,Foam dressing,
//! ```

pub mod config_repository;
pub mod connection;
pub mod report_repository;

#[cfg(test)]
pub mod test_utils;

pub use config_repository::{ConfigRepository, TrackerConfig};
pub use connection::CsvConnection;
pub use report_repository::ReportRepository;
