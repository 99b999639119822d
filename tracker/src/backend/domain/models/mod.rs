pub mod report_error;
pub mod wound_identity;

pub use report_error::ReportError;
pub use wound_identity::WoundIdentity;
