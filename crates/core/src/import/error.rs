//! Import error types.

use serde::Serialize;
use thiserror::Error;

use crate::planning::PlanningError;
use crate::reporting::ReportError;

/// A problem with one data row. Other rows are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Spreadsheet line number (the header is line 1).
    pub row: usize,
    /// Human readable message.
    pub message: String,
}

/// Errors that reject a whole file.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No file part in the upload.
    #[error("No file provided for import.")]
    NoFile,

    /// The file has a header but no data.
    #[error("No data in the file!")]
    Empty,

    /// Required columns are absent from the header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The file exceeds the configured row limit.
    #[error("The file has more than {0} rows")]
    TooManyRows(usize),

    /// The file is not valid CSV.
    #[error("Invalid CSV file: {0}")]
    Csv(String),

    /// The monthly report cannot receive the rows.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The project cannot receive the rows.
    #[error(transparent)]
    Planning(#[from] PlanningError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl ImportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoFile
            | Self::Empty
            | Self::MissingColumns(_)
            | Self::TooManyRows(_)
            | Self::Csv(_) => 400,
            Self::Report(e) => e.status_code(),
            Self::Planning(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::Empty => "empty_file",
            Self::MissingColumns(_) => "missing_columns",
            Self::TooManyRows(_) => "too_many_rows",
            Self::Csv(_) => "invalid_csv",
            Self::Report(e) => e.error_code(),
            Self::Planning(e) => e.error_code(),
            Self::Database(_) => "database_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_errors_are_bad_requests() {
        assert_eq!(ImportError::Empty.status_code(), 400);
        let err = ImportError::MissingColumns(vec!["indicator".into(), "admin0pcode".into()]);
        assert_eq!(err.to_string(), "Missing required columns: indicator, admin0pcode");
        assert_eq!(err.error_code(), "missing_columns");
    }

    #[test]
    fn test_wrapped_errors_keep_their_codes() {
        let err = ImportError::from(ReportError::NotEditable(
            crate::reporting::ReportState::Completed,
        ));
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "report_not_editable");
    }
}
