//! Property-based tests for the reporting calendar.

use chrono::{Datelike, Months, NaiveDate};
use proptest::prelude::*;

use crate::reporting::period::ReportingPeriod;
use crate::reporting::types::ReportState;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2018i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Generated months are contiguous and cover whole months
    // =========================================================================

    #[test]
    fn prop_months_are_contiguous(start in arb_date(), end in arb_date(), today in arb_date()) {
        let months = ReportingPeriod::months(start, end, today);

        for month in &months {
            prop_assert_eq!(month.from_date.day(), 1);
            prop_assert_eq!(month.to_date, ReportingPeriod::last_day_of_month(month.from_date));
        }
        for pair in months.windows(2) {
            prop_assert_eq!(pair[0].to_date.succ_opt(), Some(pair[1].from_date));
        }
    }

    #[test]
    fn prop_months_span_start_to_cutoff(start in arb_date(), end in arb_date(), today in arb_date()) {
        let months = ReportingPeriod::months(start, end, today);
        let cutoff = ReportingPeriod::first_day_of_month(end.min(today));
        let first = ReportingPeriod::first_day_of_month(start);

        if first > cutoff {
            prop_assert!(months.is_empty());
        } else {
            prop_assert_eq!(months.first().map(|m| m.from_date), Some(first));
            prop_assert_eq!(months.last().map(|m| m.from_date), Some(cutoff));
        }
    }

    // =========================================================================
    // Only the current month is todo
    // =========================================================================

    #[test]
    fn prop_only_current_month_is_todo(start in arb_date(), end in arb_date(), today in arb_date()) {
        let current = ReportingPeriod::first_day_of_month(today);
        for month in ReportingPeriod::months(start, end, today) {
            let expected = if month.from_date == current { ReportState::Todo } else { ReportState::Pending };
            prop_assert_eq!(month.state, expected);
        }
    }

    #[test]
    fn prop_last_day_is_before_next_month(date in arb_date()) {
        let last = ReportingPeriod::last_day_of_month(date);
        let next = ReportingPeriod::first_day_of_month(date).checked_add_months(Months::new(1)).unwrap();
        prop_assert_eq!(last.succ_opt(), Some(next));
    }
}
