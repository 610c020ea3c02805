//! Monthly report state transitions.

use chrono::Utc;

use reporthub_shared::{CarryOverMode, ReportingConfig};

use crate::planning::ProjectState;
use crate::reporting::error::ReportError;
use crate::reporting::types::{PlanReportCompleteness, ReportAction, ReportState};

/// Reporting behaviour resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPolicy {
    /// State of a newly created report.
    pub initial_state: ReportState,
    /// Submitted reports wait for a cluster lead.
    pub require_approval: bool,
    /// How copy-forward treats reached values.
    pub carry_over: CarryOverMode,
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self {
            initial_state: ReportState::Pending,
            require_approval: false,
            carry_over: CarryOverMode::Reset,
        }
    }
}

impl ReportingPolicy {
    /// Builds the policy from the `reporting` configuration section.
    ///
    /// Only `pending` and `todo` are accepted as initial states.
    pub fn from_config(config: &ReportingConfig) -> Result<Self, ReportError> {
        let initial_state = match ReportState::parse(&config.initial_report_state) {
            Some(state @ (ReportState::Pending | ReportState::Todo)) => state,
            _ => {
                return Err(ReportError::InvalidInitialState(
                    config.initial_report_state.clone(),
                ));
            }
        };

        Ok(Self {
            initial_state,
            require_approval: config.require_approval,
            carry_over: config.carry_over,
        })
    }
}

/// Stateless service validating report state changes.
///
/// Every method checks the preconditions and returns the action to
/// persist. Nothing is written when an error is returned.
pub struct ReportLifecycle;

impl ReportLifecycle {
    /// State of a report created for a project.
    pub fn initial_state(
        policy: &ReportingPolicy,
        project_state: ProjectState,
    ) -> Result<ReportState, ReportError> {
        if project_state != ProjectState::InProgress {
            return Err(ReportError::ProjectNotInProgress(project_state));
        }
        Ok(policy.initial_state)
    }

    /// Submit a report.
    ///
    /// The report needs at least one activity plan report, and each of
    /// those needs at least one target location report.
    pub fn submit(
        policy: &ReportingPolicy,
        current: ReportState,
        plan_reports: &[PlanReportCompleteness],
    ) -> Result<ReportAction, ReportError> {
        if !current.is_editable() {
            return Err(ReportError::InvalidTransition {
                from: current,
                to: if policy.require_approval {
                    ReportState::Submitted
                } else {
                    ReportState::Completed
                },
            });
        }
        if plan_reports.is_empty() {
            return Err(ReportError::NoActivityReports);
        }
        if let Some(report) = plan_reports.iter().find(|r| r.location_reports == 0) {
            return Err(ReportError::ActivityWithoutLocations(report.plan_report_id));
        }

        let now = Utc::now();
        if policy.require_approval {
            Ok(ReportAction::Submit {
                new_state: ReportState::Submitted,
                submitted_on: now,
                approved_on: None,
            })
        } else {
            Ok(ReportAction::Submit {
                new_state: ReportState::Completed,
                submitted_on: now,
                approved_on: Some(now),
            })
        }
    }

    /// Approve a submitted report.
    pub fn approve(current: ReportState) -> Result<ReportAction, ReportError> {
        if current != ReportState::Submitted {
            return Err(ReportError::InvalidTransition {
                from: current,
                to: ReportState::Completed,
            });
        }
        Ok(ReportAction::Approve {
            new_state: ReportState::Completed,
            approved_on: Utc::now(),
        })
    }

    /// Send a submitted or completed report back to its project.
    pub fn reject(current: ReportState, reason: &str) -> Result<ReportAction, ReportError> {
        if !matches!(current, ReportState::Submitted | ReportState::Completed) {
            return Err(ReportError::InvalidTransition {
                from: current,
                to: ReportState::Rejected,
            });
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReportError::RejectionReasonRequired);
        }
        Ok(ReportAction::Reject {
            new_state: ReportState::Rejected,
            rejected_on: Utc::now(),
            reason: reason.to_string(),
        })
    }

    /// Archive a report that is not archived yet.
    pub fn archive(current: ReportState) -> Result<ReportAction, ReportError> {
        match current {
            ReportState::Archived => Err(ReportError::InvalidTransition {
                from: current,
                to: ReportState::Archived,
            }),
            _ => Ok(ReportAction::Archive {
                new_state: ReportState::Archived,
            }),
        }
    }

    /// Reopen an archived report.
    pub fn unarchive(current: ReportState) -> Result<ReportAction, ReportError> {
        match current {
            ReportState::Archived => Ok(ReportAction::Unarchive {
                new_state: ReportState::Todo,
            }),
            _ => Err(ReportError::InvalidTransition {
                from: current,
                to: ReportState::Todo,
            }),
        }
    }

    /// Archived reports are kept.
    pub fn ensure_deletable(current: ReportState) -> Result<(), ReportError> {
        match current {
            ReportState::Archived => Err(ReportError::CannotDeleteArchived),
            _ => Ok(()),
        }
    }

    /// Entries are only written while the report is editable.
    pub fn ensure_editable(current: ReportState) -> Result<(), ReportError> {
        if current.is_editable() {
            Ok(())
        } else {
            Err(ReportError::NotEditable(current))
        }
    }

    /// Copy-forward replaces the entries of the target, so it must be editable.
    pub fn ensure_copy_target(current: ReportState) -> Result<(), ReportError> {
        Self::ensure_editable(current)
    }

    /// State of a report after copy-forward.
    #[must_use]
    pub const fn copy_forward_state() -> ReportState {
        ReportState::Pending
    }

    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: ReportState, to: ReportState) -> bool {
        match (from, to) {
            (
                ReportState::Todo | ReportState::Pending | ReportState::Rejected,
                ReportState::Submitted | ReportState::Completed,
            )
            | (ReportState::Submitted, ReportState::Completed)
            | (ReportState::Submitted | ReportState::Completed, ReportState::Rejected)
            | (ReportState::Archived, ReportState::Todo) => true,
            (from, ReportState::Archived) => from != ReportState::Archived,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporthub_shared::types::ActivityPlanReportId;

    fn complete(n: usize) -> PlanReportCompleteness {
        PlanReportCompleteness {
            plan_report_id: ActivityPlanReportId::new(),
            location_reports: n,
        }
    }

    fn approval_policy() -> ReportingPolicy {
        ReportingPolicy {
            require_approval: true,
            ..ReportingPolicy::default()
        }
    }

    #[test]
    fn test_initial_state_requires_in_progress_project() {
        let policy = ReportingPolicy::default();
        assert_eq!(
            ReportLifecycle::initial_state(&policy, ProjectState::InProgress).unwrap(),
            ReportState::Pending
        );
        assert!(matches!(
            ReportLifecycle::initial_state(&policy, ProjectState::Draft),
            Err(ReportError::ProjectNotInProgress(ProjectState::Draft))
        ));
    }

    #[test]
    fn test_policy_from_config() {
        let config = ReportingConfig {
            initial_report_state: "todo".into(),
            ..ReportingConfig::default()
        };
        let policy = ReportingPolicy::from_config(&config).unwrap();
        assert_eq!(policy.initial_state, ReportState::Todo);
        assert_eq!(policy.carry_over, CarryOverMode::Reset);

        let config = ReportingConfig {
            initial_report_state: "completed".into(),
            ..ReportingConfig::default()
        };
        assert!(matches!(
            ReportingPolicy::from_config(&config),
            Err(ReportError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_submit_without_plan_reports_is_rejected() {
        let result = ReportLifecycle::submit(&ReportingPolicy::default(), ReportState::Pending, &[]);
        assert!(matches!(result, Err(ReportError::NoActivityReports)));
    }

    #[test]
    fn test_submit_requires_locations() {
        let empty = complete(0);
        let result = ReportLifecycle::submit(
            &ReportingPolicy::default(),
            ReportState::Pending,
            &[complete(3), empty],
        );
        match result {
            Err(ReportError::ActivityWithoutLocations(id)) => {
                assert_eq!(id, empty.plan_report_id);
            }
            other => panic!("Expected ActivityWithoutLocations, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_without_review_completes() {
        let action =
            ReportLifecycle::submit(&ReportingPolicy::default(), ReportState::Pending, &[complete(1)])
                .unwrap();
        match action {
            ReportAction::Submit {
                new_state,
                submitted_on,
                approved_on,
            } => {
                assert_eq!(new_state, ReportState::Completed);
                assert_eq!(approved_on, Some(submitted_on));
            }
            other => panic!("Expected Submit, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_with_review_waits() {
        let action =
            ReportLifecycle::submit(&approval_policy(), ReportState::Rejected, &[complete(1)])
                .unwrap();
        assert!(matches!(
            action,
            ReportAction::Submit {
                new_state: ReportState::Submitted,
                approved_on: None,
                ..
            }
        ));
    }

    #[test]
    fn test_submit_from_completed_is_invalid() {
        let result = ReportLifecycle::submit(
            &ReportingPolicy::default(),
            ReportState::Completed,
            &[complete(1)],
        );
        assert!(matches!(result, Err(ReportError::InvalidTransition { .. })));
    }

    #[test]
    fn test_approve_only_submitted() {
        assert_eq!(
            ReportLifecycle::approve(ReportState::Submitted)
                .unwrap()
                .new_state(),
            ReportState::Completed
        );
        assert!(ReportLifecycle::approve(ReportState::Pending).is_err());
    }

    #[test]
    fn test_reject_needs_reason() {
        assert!(matches!(
            ReportLifecycle::reject(ReportState::Completed, "   "),
            Err(ReportError::RejectionReasonRequired)
        ));
        match ReportLifecycle::reject(ReportState::Submitted, " Totals do not match ").unwrap() {
            ReportAction::Reject { reason, .. } => assert_eq!(reason, "Totals do not match"),
            other => panic!("Expected Reject, got {other:?}"),
        }
        assert!(ReportLifecycle::reject(ReportState::Todo, "late").is_err());
    }

    #[test]
    fn test_archive_cycle() {
        let archived = ReportLifecycle::archive(ReportState::Completed).unwrap();
        assert_eq!(archived.new_state(), ReportState::Archived);
        assert!(!archived.is_active());
        assert!(ReportLifecycle::archive(ReportState::Archived).is_err());

        let restored = ReportLifecycle::unarchive(ReportState::Archived).unwrap();
        assert_eq!(restored.new_state(), ReportState::Todo);
        assert!(ReportLifecycle::unarchive(ReportState::Pending).is_err());
    }

    #[test]
    fn test_delete_and_edit_guards() {
        assert!(ReportLifecycle::ensure_deletable(ReportState::Completed).is_ok());
        assert!(matches!(
            ReportLifecycle::ensure_deletable(ReportState::Archived),
            Err(ReportError::CannotDeleteArchived)
        ));
        assert!(ReportLifecycle::ensure_editable(ReportState::Rejected).is_ok());
        assert!(matches!(
            ReportLifecycle::ensure_editable(ReportState::Submitted),
            Err(ReportError::NotEditable(ReportState::Submitted))
        ));
    }
}
