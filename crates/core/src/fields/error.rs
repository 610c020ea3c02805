//! Report field errors.

use serde::Serialize;
use thiserror::Error;

/// A single rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors raised by field schemas.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The stored schema itself is malformed.
    #[error("Invalid field schema: {0}")]
    InvalidSchema(String),

    /// One or more values do not match the schema.
    #[error("Invalid report fields: {}", summarize(.0))]
    Invalid(Vec<FieldViolation>),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSchema(_) => 500,
            Self::Invalid(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSchema(_) => "invalid_field_schema",
            Self::Invalid(_) => "invalid_report_fields",
        }
    }

    /// Per-field violations, empty for schema errors.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::InvalidSchema(_) => &[],
            Self::Invalid(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lists_fields() {
        let err = FieldError::Invalid(vec![
            FieldViolation::new("households", "must be at least 0"),
            FieldViolation::new("modality", "is required"),
        ]);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Invalid report fields: households: must be at least 0; modality: is required"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_schema_error_is_internal() {
        let err = FieldError::InvalidSchema("duplicate field".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "invalid_field_schema");
        assert!(err.violations().is_empty());
    }
}
