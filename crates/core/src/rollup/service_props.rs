//! Property-based tests for roll-ups.

use proptest::prelude::*;

use crate::reporting::BeneficiaryStatus;
use crate::rollup::service::{ReachedEntry, Rollup};

fn arb_entry() -> impl Strategy<Value = ReachedEntry> {
    (0i64..100_000, any::<bool>()).prop_map(|(reached, new)| ReachedEntry {
        reached,
        status: if new {
            BeneficiaryStatus::NewBeneficiary
        } else {
            BeneficiaryStatus::ExistingBeneficiaries
        },
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // target_achieved is the plain sum of targets
    // =========================================================================

    #[test]
    fn prop_target_achieved_is_sum(targets in prop::collection::vec(0i64..1_000_000, 0..50)) {
        let expected: i64 = targets.iter().sum();
        prop_assert_eq!(Rollup::target_achieved(targets), expected);
    }

    #[test]
    fn prop_target_achieved_ignores_order(mut targets in prop::collection::vec(0i64..1_000_000, 0..50)) {
        let forward = Rollup::target_achieved(targets.clone());
        targets.reverse();
        prop_assert_eq!(Rollup::target_achieved(targets), forward);
    }

    // =========================================================================
    // Reached ignores carried-over people
    // =========================================================================

    #[test]
    fn prop_reached_counts_new_only(entries in prop::collection::vec(arb_entry(), 0..30)) {
        let result = Rollup::target_and_reached(Some(1), &entries);
        let new_only: i64 = entries
            .iter()
            .filter(|e| e.status == BeneficiaryStatus::NewBeneficiary)
            .map(|e| e.reached)
            .sum();
        prop_assert_eq!(result.reached, new_only);

        let mut with_existing = entries.clone();
        with_existing.push(ReachedEntry { reached: 99, status: BeneficiaryStatus::ExistingBeneficiaries });
        prop_assert_eq!(Rollup::target_and_reached(Some(1), &with_existing).reached, new_only);
    }
}
