//! Access error types.

use thiserror::Error;

/// Permission failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Caller may not change the project or its reports.
    #[error("You are not allowed to edit this project")]
    NotProjectEditor,

    /// Caller is not a lead of any of the project's clusters.
    #[error("Only cluster leads can review monthly reports")]
    NotClusterLead,

    /// Caller may not see the requested dashboard.
    #[error("You are not allowed to view this dashboard")]
    DashboardDenied,

    /// Reference data is maintained by administrators.
    #[error("Only administrators can change reference data")]
    SuperuserRequired,
}

impl AccessError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        403
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotProjectEditor => "not_project_editor",
            Self::NotClusterLead => "not_cluster_lead",
            Self::DashboardDenied => "dashboard_denied",
            Self::SuperuserRequired => "superuser_required",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_forbidden() {
        for err in [
            AccessError::NotProjectEditor,
            AccessError::NotClusterLead,
            AccessError::DashboardDenied,
            AccessError::SuperuserRequired,
        ] {
            assert_eq!(err.status_code(), 403);
        }
        assert_eq!(AccessError::NotClusterLead.error_code(), "not_cluster_lead");
    }
}
