//! Carry-over rules for copy-forward.

use reporthub_shared::CarryOverMode;

use crate::reporting::types::BeneficiaryStatus;

/// Values held by one disaggregation location report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisaggregationValues {
    /// Planned people for the period.
    pub target: i64,
    /// People still needing assistance.
    pub target_required: i64,
    /// People reached in the period.
    pub reached: i64,
}

/// Decides what a copied report row starts with.
pub struct CarryOver;

impl CarryOver {
    /// Values of a copied disaggregation row.
    ///
    /// `Reset` keeps the target and clears what was reached. `Seed` copies
    /// everything.
    #[must_use]
    pub const fn values(mode: CarryOverMode, source: DisaggregationValues) -> DisaggregationValues {
        match mode {
            CarryOverMode::Reset => DisaggregationValues {
                target: source.target,
                target_required: 0,
                reached: 0,
            },
            CarryOverMode::Seed => source,
        }
    }

    /// People in a copied period were already reached before.
    #[must_use]
    pub const fn beneficiary_status() -> BeneficiaryStatus {
        BeneficiaryStatus::ExistingBeneficiaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: DisaggregationValues = DisaggregationValues {
        target: 40,
        target_required: 12,
        reached: 28,
    };

    #[test]
    fn test_reset_clears_reached() {
        let copied = CarryOver::values(CarryOverMode::Reset, SOURCE);
        assert_eq!(copied.target, 40);
        assert_eq!(copied.reached, 0);
        assert_eq!(copied.target_required, 0);
    }

    #[test]
    fn test_seed_copies_everything() {
        assert_eq!(CarryOver::values(CarryOverMode::Seed, SOURCE), SOURCE);
    }

    #[test]
    fn test_copied_rows_are_existing_beneficiaries() {
        assert_eq!(
            CarryOver::beneficiary_status(),
            BeneficiaryStatus::ExistingBeneficiaries
        );
    }
}
