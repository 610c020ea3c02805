//! Reporting error types.

use thiserror::Error;
use uuid::Uuid;

use reporthub_shared::types::ActivityPlanReportId;

use crate::fields::FieldError;
use crate::location::LocationError;
use crate::planning::ProjectState;
use crate::reporting::types::ReportState;

/// Errors that can occur while managing monthly reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reports are only opened for projects in progress.
    #[error("Monthly reports can only be created for in-progress projects (project is {0})")]
    ProjectNotInProgress(ProjectState),

    /// Attempted an invalid state transition.
    #[error("Invalid report state transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: ReportState,
        /// The attempted target state.
        to: ReportState,
    },

    /// Submission without any activity plan report.
    #[error("Report has no activity plan reports")]
    NoActivityReports,

    /// An activity plan report without location reports blocks submission.
    #[error("Activity plan report {0} has no target location reports")]
    ActivityWithoutLocations(ActivityPlanReportId),

    /// Rejection reason is empty.
    #[error("A rejection reason is required")]
    RejectionReasonRequired,

    /// Archived reports are never deleted.
    #[error("Archived reports cannot be deleted")]
    CannotDeleteArchived,

    /// Changes are not accepted in the current state.
    #[error("Report is {0} and cannot be modified")]
    NotEditable(ReportState),

    /// Copy-forward needs a completed report to copy from.
    #[error("At least one approved prior report is required")]
    NoApprovedSource,

    /// Configured initial state is not `pending` or `todo`.
    #[error("Invalid initial report state: {0}")]
    InvalidInitialState(String),

    /// Report period ends before it starts.
    #[error("Report period must not end before it starts")]
    InvalidPeriod,

    /// Negative beneficiary count.
    #[error("{field} must not be negative")]
    NegativeValue {
        /// Offending field.
        field: &'static str,
    },

    /// Disaggregation is not configured for the indicator.
    #[error("Disaggregation {0} is not configured for this indicator")]
    UnknownDisaggregation(Uuid),

    /// Same disaggregation given twice for one location.
    #[error("Disaggregation {0} appears more than once")]
    DuplicateDisaggregation(Uuid),

    /// Target location belongs to another activity plan.
    #[error("Target location does not belong to the reported activity plan")]
    ActivityPlanMismatch,

    /// A location report without a target location needs its admin levels.
    #[error("{0} is required when no target location is given")]
    LocationRequired(&'static str),

    /// Activity plan belongs to another project.
    #[error("Activity plan does not belong to the report's project")]
    ProjectMismatch,

    /// Report field values do not match the activity type schema.
    #[error(transparent)]
    Fields(#[from] FieldError),

    /// Reported locations do not form a valid admin path.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Monthly report not found.
    #[error("Monthly report {0} not found")]
    ReportNotFound(Uuid),

    /// Project not found.
    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    /// Activity plan report not found.
    #[error("Activity plan report {0} not found")]
    PlanReportNotFound(Uuid),

    /// Target location report not found.
    #[error("Target location report {0} not found")]
    LocationReportNotFound(Uuid),

    /// Referenced planning row not found.
    #[error("{kind} {id} not found")]
    ReferenceNotFound {
        /// Entity kind.
        kind: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RejectionReasonRequired
            | Self::InvalidPeriod
            | Self::NegativeValue { .. }
            | Self::UnknownDisaggregation(_)
            | Self::DuplicateDisaggregation(_)
            | Self::ActivityPlanMismatch
            | Self::LocationRequired(_)
            | Self::ProjectMismatch => 400,
            Self::Fields(e) => e.status_code(),
            Self::Location(e) => e.status_code(),
            Self::ReportNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::PlanReportNotFound(_)
            | Self::LocationReportNotFound(_)
            | Self::ReferenceNotFound { .. } => 404,
            Self::ProjectNotInProgress(_)
            | Self::InvalidTransition { .. }
            | Self::NoActivityReports
            | Self::ActivityWithoutLocations(_)
            | Self::CannotDeleteArchived
            | Self::NotEditable(_)
            | Self::NoApprovedSource => 422,
            Self::InvalidInitialState(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProjectNotInProgress(_) => "project_not_in_progress",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::NoActivityReports => "no_activity_reports",
            Self::ActivityWithoutLocations(_) => "activity_without_locations",
            Self::RejectionReasonRequired => "rejection_reason_required",
            Self::CannotDeleteArchived => "cannot_delete_archived",
            Self::NotEditable(_) => "report_not_editable",
            Self::NoApprovedSource => "no_approved_source",
            Self::InvalidInitialState(_) => "invalid_initial_state",
            Self::InvalidPeriod => "invalid_period",
            Self::NegativeValue { .. } => "negative_value",
            Self::UnknownDisaggregation(_) => "unknown_disaggregation",
            Self::DuplicateDisaggregation(_) => "duplicate_disaggregation",
            Self::ActivityPlanMismatch => "activity_plan_mismatch",
            Self::LocationRequired(_) => "location_required",
            Self::ProjectMismatch => "project_mismatch",
            Self::Fields(e) => e.error_code(),
            Self::Location(e) => e.error_code(),
            Self::ReportNotFound(_) => "report_not_found",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::PlanReportNotFound(_) => "plan_report_not_found",
            Self::LocationReportNotFound(_) => "location_report_not_found",
            Self::ReferenceNotFound { .. } => "not_found",
            Self::Database(_) => "database_error",
        }
    }
}
