//! Property-based tests for dashboard aggregation.

use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use crate::dashboard::service::summarize;
use crate::dashboard::types::ReachRecord;

fn arb_record() -> impl Strategy<Value = ReachRecord> {
    (
        1u32..=12,
        prop::sample::select(vec!["Hygiene", "Water", "Cash"]),
        prop::sample::select(vec!["Girls(0-5)", "Boys(0-5)", "Households", "IDP households"]),
        0i64..10_000,
    )
        .prop_map(|(month, domain, name, reached)| ReachRecord {
            report_month: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            indicator_id: Uuid::nil(),
            implementing_partner_id: None,
            province_id: None,
            activity_domain: domain.to_string(),
            disaggregation_name: Some(name.to_string()),
            reached,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // People reached never includes households
    // =========================================================================

    #[test]
    fn prop_people_excludes_households(records in prop::collection::vec(arb_record(), 0..40)) {
        let summary = summarize(&records);
        let expected: i64 = records
            .iter()
            .filter(|r| !r.disaggregation_name.as_deref().unwrap_or("").to_lowercase().contains("households"))
            .map(|r| r.reached)
            .sum();

        prop_assert_eq!(summary.people_reached, expected);
        let monthly: i64 = summary.people_reached_by_month.iter().map(|m| m.reached).sum();
        prop_assert_eq!(monthly, expected);
    }

    // =========================================================================
    // Each matrix row total equals the sum of its domains
    // =========================================================================

    #[test]
    fn prop_matrix_totals(records in prop::collection::vec(arb_record(), 0..40)) {
        let summary = summarize(&records);
        for row in summary.reach_by_activity.values() {
            let by_domain: i64 = row.iter().filter(|(k, _)| k.as_str() != "total").map(|(_, v)| v).sum();
            prop_assert_eq!(row.get("total").copied(), Some(by_domain));
        }
    }
}
