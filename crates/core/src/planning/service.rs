//! Project lifecycle transitions.

use chrono::NaiveDate;

use crate::planning::error::PlanningError;
use crate::planning::types::{PlanSummary, ProjectState, ProjectTransition};

/// Minimum length of a project title.
pub const MIN_TITLE_LENGTH: usize = 6;

/// Stateless service validating project state changes.
///
/// Each transition returns the state and active flag that the persistence
/// layer writes to the project and cascades to its plans and target
/// locations.
pub struct ProjectLifecycle;

impl ProjectLifecycle {
    /// Validates the editable fields of a new or updated project.
    pub fn validate_details(
        title: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), PlanningError> {
        if title.trim().chars().count() < MIN_TITLE_LENGTH {
            return Err(PlanningError::TitleTooShort {
                min: MIN_TITLE_LENGTH,
            });
        }
        if end_date < start_date {
            return Err(PlanningError::InvalidDateRange);
        }
        Ok(())
    }

    /// Submit a draft project.
    ///
    /// Requires at least one activity plan, and every plan needs at least
    /// one target location.
    pub fn submit(
        current: ProjectState,
        plans: &[PlanSummary],
    ) -> Result<ProjectTransition, PlanningError> {
        if current != ProjectState::Draft {
            return Err(PlanningError::InvalidTransition {
                from: current,
                to: ProjectState::InProgress,
            });
        }
        if plans.is_empty() {
            return Err(PlanningError::NoActivityPlans);
        }
        if let Some(plan) = plans.iter().find(|p| p.target_locations == 0) {
            return Err(PlanningError::PlanWithoutLocations(plan.activity_plan_id));
        }

        Ok(ProjectTransition {
            new_state: ProjectState::InProgress,
            is_active: true,
        })
    }

    /// Archive a project that is not archived yet.
    pub fn archive(current: ProjectState) -> Result<ProjectTransition, PlanningError> {
        match current {
            ProjectState::Archived => Err(PlanningError::InvalidTransition {
                from: current,
                to: ProjectState::Archived,
            }),
            _ => Ok(ProjectTransition {
                new_state: ProjectState::Archived,
                is_active: false,
            }),
        }
    }

    /// Bring an archived project back as a draft.
    pub fn unarchive(current: ProjectState) -> Result<ProjectTransition, PlanningError> {
        match current {
            ProjectState::Archived => Ok(ProjectTransition {
                new_state: ProjectState::Draft,
                is_active: true,
            }),
            _ => Err(PlanningError::InvalidTransition {
                from: current,
                to: ProjectState::Draft,
            }),
        }
    }

    /// Complete an in-progress project.
    ///
    /// `open_reports` counts monthly reports still pending or awaiting review.
    pub fn complete(
        current: ProjectState,
        open_reports: u64,
    ) -> Result<ProjectTransition, PlanningError> {
        if current != ProjectState::InProgress {
            return Err(PlanningError::InvalidTransition {
                from: current,
                to: ProjectState::Completed,
            });
        }
        if open_reports > 0 {
            return Err(PlanningError::OpenReports(open_reports));
        }
        Ok(ProjectTransition {
            new_state: ProjectState::Completed,
            is_active: true,
        })
    }

    /// Archived projects are kept.
    pub fn ensure_deletable(current: ProjectState) -> Result<(), PlanningError> {
        match current {
            ProjectState::Archived => Err(PlanningError::CannotDeleteArchived),
            _ => Ok(()),
        }
    }

    /// Plans and target locations are only edited while the project is editable.
    pub fn ensure_editable(current: ProjectState) -> Result<(), PlanningError> {
        if current.is_editable() {
            Ok(())
        } else {
            Err(PlanningError::NotEditable(current))
        }
    }

    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: ProjectState, to: ProjectState) -> bool {
        matches!(
            (from, to),
            (ProjectState::Draft, ProjectState::InProgress)
                | (ProjectState::InProgress, ProjectState::Completed)
                | (
                    ProjectState::Draft | ProjectState::InProgress | ProjectState::Completed,
                    ProjectState::Archived
                )
                | (ProjectState::Archived, ProjectState::Draft)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporthub_shared::types::ActivityPlanId;

    fn plan(locations: usize) -> PlanSummary {
        PlanSummary {
            activity_plan_id: ActivityPlanId::new(),
            target_locations: locations,
        }
    }

    #[test]
    fn test_submit_requires_plans() {
        let result = ProjectLifecycle::submit(ProjectState::Draft, &[]);
        assert!(matches!(result, Err(PlanningError::NoActivityPlans)));
    }

    #[test]
    fn test_submit_requires_locations_on_every_plan() {
        let empty = plan(0);
        let result = ProjectLifecycle::submit(ProjectState::Draft, &[plan(2), empty]);
        match result {
            Err(PlanningError::PlanWithoutLocations(id)) => assert_eq!(id, empty.activity_plan_id),
            other => panic!("Expected PlanWithoutLocations, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_moves_to_in_progress() {
        let transition = ProjectLifecycle::submit(ProjectState::Draft, &[plan(1)]).unwrap();
        assert_eq!(transition.new_state, ProjectState::InProgress);
        assert!(transition.is_active);
    }

    #[test]
    fn test_submit_only_from_draft() {
        let result = ProjectLifecycle::submit(ProjectState::InProgress, &[plan(1)]);
        assert!(matches!(
            result,
            Err(PlanningError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_archive_and_unarchive() {
        let archived = ProjectLifecycle::archive(ProjectState::InProgress).unwrap();
        assert_eq!(archived.new_state, ProjectState::Archived);
        assert!(!archived.is_active);

        let restored = ProjectLifecycle::unarchive(ProjectState::Archived).unwrap();
        assert_eq!(restored.new_state, ProjectState::Draft);
        assert!(restored.is_active);

        assert!(ProjectLifecycle::archive(ProjectState::Archived).is_err());
        assert!(ProjectLifecycle::unarchive(ProjectState::Draft).is_err());
    }

    #[test]
    fn test_complete_blocked_by_open_reports() {
        assert!(matches!(
            ProjectLifecycle::complete(ProjectState::InProgress, 2),
            Err(PlanningError::OpenReports(2))
        ));
        assert_eq!(
            ProjectLifecycle::complete(ProjectState::InProgress, 0)
                .unwrap()
                .new_state,
            ProjectState::Completed
        );
    }

    #[test]
    fn test_archived_projects_are_not_deleted() {
        assert!(ProjectLifecycle::ensure_deletable(ProjectState::Draft).is_ok());
        assert!(matches!(
            ProjectLifecycle::ensure_deletable(ProjectState::Archived),
            Err(PlanningError::CannotDeleteArchived)
        ));
    }

    #[test]
    fn test_validate_details() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(ProjectLifecycle::validate_details("Winter response", start, end).is_ok());
        assert!(matches!(
            ProjectLifecycle::validate_details("WASH", start, end),
            Err(PlanningError::TitleTooShort { min: 6 })
        ));
        assert!(matches!(
            ProjectLifecycle::validate_details("Winter response", end, start),
            Err(PlanningError::InvalidDateRange)
        ));
    }
}
