//! Roll-up arithmetic.

use serde::{Deserialize, Serialize};

use crate::reporting::BeneficiaryStatus;

/// A reached value with the status of its location report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachedEntry {
    /// People reached.
    pub reached: i64,
    /// Status of the target location report.
    pub status: BeneficiaryStatus,
}

/// Planned target against people reached for one location and disaggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAndReached {
    /// Planned target, 0 when nothing was planned.
    pub target: i64,
    /// People reached for the first time, across all reports.
    pub reached: i64,
}

/// Stateless roll-up functions.
pub struct Rollup;

impl Rollup {
    /// `target_achieved` of an activity plan report: the sum of every
    /// disaggregation target under it.
    pub fn target_achieved<I>(targets: I) -> i64
    where
        I: IntoIterator<Item = i64>,
    {
        targets.into_iter().fold(0i64, i64::saturating_add)
    }

    /// Planned target and reached count for a target location.
    ///
    /// Only new beneficiaries are counted as reached, so people carried
    /// over between periods are not counted twice.
    #[must_use]
    pub fn target_and_reached(planned: Option<i64>, entries: &[ReachedEntry]) -> TargetAndReached {
        let reached = entries
            .iter()
            .filter(|e| e.status == BeneficiaryStatus::NewBeneficiary)
            .map(|e| e.reached)
            .fold(0i64, i64::saturating_add);

        TargetAndReached {
            target: planned.unwrap_or(0),
            reached,
        }
    }
}
