//! Export error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// The output could not be written.
    #[error("I/O error: {0}")]
    Io(String),

    /// Monthly report not found.
    #[error("Monthly report {0} not found")]
    ReportNotFound(Uuid),

    /// Database error while loading the rows.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl ExportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReportNotFound(_) => 404,
            Self::Csv(_) | Self::Io(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Csv(_) | Self::Io(_) => "export_failed",
            Self::ReportNotFound(_) => "report_not_found",
            Self::Database(_) => "database_error",
        }
    }
}
