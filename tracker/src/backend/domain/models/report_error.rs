use thiserror::Error;

/// Domain-level rejections raised by the report service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Role '{role}' is not allowed to {action}")]
    Unauthorized { role: String, action: String },
}
