//! Property-based tests for ReportLifecycle.

use proptest::prelude::*;

use reporthub_shared::CarryOverMode;
use reporthub_shared::types::ActivityPlanReportId;

use crate::reporting::carry::{CarryOver, DisaggregationValues};
use crate::reporting::error::ReportError;
use crate::reporting::service::{ReportLifecycle, ReportingPolicy};
use crate::reporting::types::{PlanReportCompleteness, ReportAction, ReportState};

fn arb_state() -> impl Strategy<Value = ReportState> {
    prop::sample::select(ReportState::ALL.to_vec())
}

fn arb_plan_reports() -> impl Strategy<Value = Vec<PlanReportCompleteness>> {
    prop::collection::vec(0usize..4, 0..6).prop_map(|counts| {
        counts
            .into_iter()
            .map(|location_reports| PlanReportCompleteness {
                plan_report_id: ActivityPlanReportId::new(),
                location_reports,
            })
            .collect()
    })
}

fn arb_values() -> impl Strategy<Value = DisaggregationValues> {
    (0i64..10_000, 0i64..10_000, 0i64..10_000).prop_map(|(target, target_required, reached)| {
        DisaggregationValues {
            target,
            target_required,
            reached,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Submission never skips the data checks
    // =========================================================================

    #[test]
    fn prop_submit_requires_complete_tree(
        state in arb_state(),
        plan_reports in arb_plan_reports(),
        require_approval in any::<bool>(),
    ) {
        let policy = ReportingPolicy { require_approval, ..ReportingPolicy::default() };
        let result = ReportLifecycle::submit(&policy, state, &plan_reports);
        let complete = !plan_reports.is_empty()
            && plan_reports.iter().all(|r| r.location_reports > 0);

        prop_assert_eq!(result.is_ok(), state.is_editable() && complete);
        if state.is_editable() && plan_reports.is_empty() {
            prop_assert!(matches!(result, Err(ReportError::NoActivityReports)));
        }
    }

    #[test]
    fn prop_submit_stamps_match_policy(require_approval in any::<bool>()) {
        let policy = ReportingPolicy { require_approval, ..ReportingPolicy::default() };
        let reports = [PlanReportCompleteness { plan_report_id: ActivityPlanReportId::new(), location_reports: 1 }];
        let action = ReportLifecycle::submit(&policy, ReportState::Pending, &reports).unwrap();

        match action {
            ReportAction::Submit { new_state, approved_on, .. } => {
                prop_assert_eq!(approved_on.is_some(), !require_approval);
                prop_assert_eq!(new_state == ReportState::Submitted, require_approval);
            }
            _ => prop_assert!(false, "expected a submit action"),
        }
    }

    // =========================================================================
    // Every successful transition is listed as valid
    // =========================================================================

    #[test]
    fn prop_transitions_match_table(state in arb_state()) {
        let reports = [PlanReportCompleteness { plan_report_id: ActivityPlanReportId::new(), location_reports: 1 }];
        let results = [
            ReportLifecycle::submit(&ReportingPolicy::default(), state, &reports),
            ReportLifecycle::approve(state),
            ReportLifecycle::reject(state, "incomplete"),
            ReportLifecycle::archive(state),
            ReportLifecycle::unarchive(state),
        ];
        for action in results.into_iter().flatten() {
            prop_assert!(ReportLifecycle::is_valid_transition(state, action.new_state()));
        }
    }

    // =========================================================================
    // Carry-over
    // =========================================================================

    #[test]
    fn prop_reset_zeroes_reached(values in arb_values()) {
        let copied = CarryOver::values(CarryOverMode::Reset, values);
        prop_assert_eq!(copied.reached, 0);
        prop_assert_eq!(copied.target_required, 0);
        prop_assert_eq!(copied.target, values.target);
    }

    #[test]
    fn prop_seed_is_identity(values in arb_values()) {
        prop_assert_eq!(CarryOver::values(CarryOverMode::Seed, values), values);
    }
}
