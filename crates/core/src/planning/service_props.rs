//! Property-based tests for ProjectLifecycle.

use proptest::prelude::*;

use reporthub_shared::types::ActivityPlanId;

use crate::planning::error::PlanningError;
use crate::planning::service::ProjectLifecycle;
use crate::planning::types::{PlanSummary, ProjectState};

fn arb_state() -> impl Strategy<Value = ProjectState> {
    prop_oneof![
        Just(ProjectState::Draft),
        Just(ProjectState::InProgress),
        Just(ProjectState::Completed),
        Just(ProjectState::Archived),
    ]
}

fn arb_plans() -> impl Strategy<Value = Vec<PlanSummary>> {
    prop::collection::vec(0usize..5, 0..8).prop_map(|counts| {
        counts
            .into_iter()
            .map(|target_locations| PlanSummary {
                activity_plan_id: ActivityPlanId::new(),
                target_locations,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Submission succeeds exactly when every plan has a location
    // =========================================================================

    #[test]
    fn prop_submit_requires_complete_plans(plans in arb_plans()) {
        let result = ProjectLifecycle::submit(ProjectState::Draft, &plans);
        let complete = !plans.is_empty() && plans.iter().all(|p| p.target_locations > 0);

        prop_assert_eq!(result.is_ok(), complete);
        if plans.is_empty() {
            prop_assert!(matches!(result, Err(PlanningError::NoActivityPlans)));
        }
    }

    // =========================================================================
    // Every successful transition is listed as valid
    // =========================================================================

    #[test]
    fn prop_transitions_match_table(state in arb_state(), open in 0u64..3) {
        let plans = [PlanSummary { activity_plan_id: ActivityPlanId::new(), target_locations: 1 }];
        let results = [
            ProjectLifecycle::submit(state, &plans),
            ProjectLifecycle::archive(state),
            ProjectLifecycle::unarchive(state),
            ProjectLifecycle::complete(state, open),
        ];
        for transition in results.into_iter().flatten() {
            prop_assert!(ProjectLifecycle::is_valid_transition(state, transition.new_state));
        }
    }

    #[test]
    fn prop_only_archived_is_undeletable(state in arb_state()) {
        let deletable = ProjectLifecycle::ensure_deletable(state).is_ok();
        prop_assert_eq!(deletable, state != ProjectState::Archived);
    }
}
