//! Planning error types.

use thiserror::Error;
use uuid::Uuid;

use reporthub_shared::types::ActivityPlanId;

use crate::location::LocationError;
use crate::planning::types::ProjectState;

/// Errors that can occur while managing the planned tree.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Attempted an invalid state transition.
    #[error("Invalid project state transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: ProjectState,
        /// The attempted target state.
        to: ProjectState,
    },

    /// A project cannot be submitted without activity plans.
    #[error("Project has no activity plans")]
    NoActivityPlans,

    /// An activity plan without target locations blocks submission.
    #[error("Activity plan {0} has no target locations")]
    PlanWithoutLocations(ActivityPlanId),

    /// Monthly reports still waiting for submission or review.
    #[error("Project still has {0} open monthly reports")]
    OpenReports(u64),

    /// Archived projects are never deleted.
    #[error("Archived projects cannot be deleted")]
    CannotDeleteArchived,

    /// Changes are not accepted in the current state.
    #[error("Project is {0} and cannot be modified")]
    NotEditable(ProjectState),

    /// Title shorter than six characters.
    #[error("Project title must be at least {min} characters")]
    TitleTooShort {
        /// Minimum length.
        min: usize,
    },

    /// End date before start date.
    #[error("Project end date must not be before its start date")]
    InvalidDateRange,

    /// A planned target below zero.
    #[error("Targets must be non-negative")]
    NegativeTarget,

    /// Activity type outside the chosen domain, or indicator outside the type.
    #[error("{0}")]
    ActivityMismatch(String),

    /// Project code already in use.
    #[error("Project code {0} already exists")]
    DuplicateCode(String),

    /// Referenced location is not usable.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Project not found.
    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    /// Activity plan not found.
    #[error("Activity plan {0} not found")]
    ActivityPlanNotFound(Uuid),

    /// Target location not found.
    #[error("Target location {0} not found")]
    TargetLocationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PlanningError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TitleTooShort { .. }
            | Self::InvalidDateRange
            | Self::NegativeTarget
            | Self::ActivityMismatch(_) => 400,
            Self::Location(e) => e.status_code(),
            Self::ProjectNotFound(_)
            | Self::ActivityPlanNotFound(_)
            | Self::TargetLocationNotFound(_) => 404,
            Self::DuplicateCode(_) => 409,
            Self::InvalidTransition { .. }
            | Self::NoActivityPlans
            | Self::PlanWithoutLocations(_)
            | Self::OpenReports(_)
            | Self::CannotDeleteArchived
            | Self::NotEditable(_) => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::NoActivityPlans => "no_activity_plans",
            Self::PlanWithoutLocations(_) => "plan_without_locations",
            Self::OpenReports(_) => "open_reports",
            Self::CannotDeleteArchived => "cannot_delete_archived",
            Self::NotEditable(_) => "project_not_editable",
            Self::TitleTooShort { .. } => "title_too_short",
            Self::InvalidDateRange => "invalid_date_range",
            Self::NegativeTarget => "negative_target",
            Self::ActivityMismatch(_) => "activity_mismatch",
            Self::DuplicateCode(_) => "duplicate_project_code",
            Self::Location(e) => e.error_code(),
            Self::ProjectNotFound(_) => "project_not_found",
            Self::ActivityPlanNotFound(_) => "activity_plan_not_found",
            Self::TargetLocationNotFound(_) => "target_location_not_found",
            Self::Database(_) => "database_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_are_422() {
        assert_eq!(PlanningError::NoActivityPlans.status_code(), 422);
        assert_eq!(PlanningError::OpenReports(2).status_code(), 422);
        assert_eq!(PlanningError::CannotDeleteArchived.status_code(), 422);
        assert_eq!(
            PlanningError::PlanWithoutLocations(ActivityPlanId::new()).error_code(),
            "plan_without_locations"
        );
    }

    #[test]
    fn test_location_error_passes_through() {
        let err = PlanningError::from(LocationError::NotFound("AF".into()));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "location_not_found");
    }

    #[test]
    fn test_open_reports_message() {
        assert_eq!(
            PlanningError::OpenReports(3).to_string(),
            "Project still has 3 open monthly reports"
        );
    }
}
