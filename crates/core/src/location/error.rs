//! Location error types.

use thiserror::Error;

use crate::location::tree::AdminLevel;

/// Errors raised when building or walking the location tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    /// Level outside 0..=3.
    #[error("Invalid location level {0}")]
    InvalidLevel(i16),

    /// A country was given a parent.
    #[error("A country cannot have a parent location")]
    CountryWithParent,

    /// A non-country location without a parent.
    #[error("A {level} location requires a parent")]
    MissingParent {
        /// Level of the orphan.
        level: AdminLevel,
    },

    /// Parent sits at the wrong level.
    #[error("A {level} location must have a {expected} parent, got {actual}")]
    ParentLevelMismatch {
        /// Level of the child.
        level: AdminLevel,
        /// Level the parent should have.
        expected: AdminLevel,
        /// Level the parent has.
        actual: AdminLevel,
    },

    /// A referenced location sits at the wrong level.
    #[error("'{code}' is a {actual}, expected a {expected}")]
    WrongLevel {
        /// Location code.
        code: String,
        /// Level required at this position.
        expected: AdminLevel,
        /// Level the location has.
        actual: AdminLevel,
    },

    /// `child` is not located under `parent`.
    #[error("{level} '{code}' is not inside '{parent_code}'")]
    OutsideParent {
        /// Level of the child.
        level: AdminLevel,
        /// Child code.
        code: String,
        /// Expected parent code.
        parent_code: String,
    },

    /// Location not found.
    #[error("Location {0} not found")]
    NotFound(String),

    /// Code already taken.
    #[error("Location code {0} already exists")]
    DuplicateCode(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LocationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidLevel(_)
            | Self::CountryWithParent
            | Self::MissingParent { .. }
            | Self::ParentLevelMismatch { .. }
            | Self::WrongLevel { .. }
            | Self::OutsideParent { .. } => 400,
            Self::NotFound(_) => 404,
            Self::DuplicateCode(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLevel(_) => "invalid_level",
            Self::CountryWithParent => "country_with_parent",
            Self::MissingParent { .. } => "missing_parent",
            Self::ParentLevelMismatch { .. } => "parent_level_mismatch",
            Self::WrongLevel { .. } => "wrong_level",
            Self::OutsideParent { .. } => "outside_parent",
            Self::NotFound(_) => "location_not_found",
            Self::DuplicateCode(_) => "duplicate_location_code",
            Self::Database(_) => "database_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message() {
        let err = LocationError::ParentLevelMismatch {
            level: AdminLevel::District,
            expected: AdminLevel::Province,
            actual: AdminLevel::Country,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "A district location must have a province parent, got country"
        );
    }

    #[test]
    fn test_not_found_and_duplicate() {
        assert_eq!(LocationError::NotFound("AF".into()).status_code(), 404);
        assert_eq!(LocationError::DuplicateCode("AF".into()).status_code(), 409);
        assert_eq!(
            LocationError::DuplicateCode("AF".into()).error_code(),
            "duplicate_location_code"
        );
    }
}
