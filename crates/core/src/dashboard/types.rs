//! Dashboard data types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reporting::ReportState;

/// One reached value as loaded for a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachRecord {
    /// First day of the reported month.
    pub report_month: NaiveDate,
    /// Indicator of the activity plan report.
    pub indicator_id: Uuid,
    /// Implementing partner of the planned location, if any.
    pub implementing_partner_id: Option<Uuid>,
    /// Province of the location report.
    pub province_id: Option<Uuid>,
    /// Activity domain name.
    pub activity_domain: String,
    /// Disaggregation name, `None` for location reports without values.
    pub disaggregation_name: Option<String>,
    /// People reached.
    pub reached: i64,
}

/// People reached in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReach {
    /// First day of the month.
    pub month: NaiveDate,
    /// Short month name, e.g. `Mar`.
    pub label: String,
    /// People reached.
    pub reached: i64,
}

/// Cluster or organization 5W figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveWSummary {
    /// Distinct indicators reported on.
    pub indicators_count: usize,
    /// Distinct implementing partners.
    pub implementing_partners_count: usize,
    /// Distinct provinces reached.
    pub provinces_count: usize,
    /// People reached, households excluded.
    pub people_reached: i64,
    /// People reached per month, oldest first.
    pub people_reached_by_month: Vec<MonthlyReach>,
    /// Activity domain names, sorted.
    pub activity_domains: Vec<String>,
    /// Disaggregation name → activity domain → reached, with a `total` entry.
    pub reach_by_activity: BTreeMap<String, BTreeMap<String, i64>>,
}

/// Number of monthly reports per state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStateCounts {
    /// Current month, open.
    pub todo: u64,
    /// Waiting for submission.
    pub pending: u64,
    /// Waiting for review.
    pub submitted: u64,
    /// Sent back.
    pub rejected: u64,
    /// Accepted.
    pub completed: u64,
    /// Archived.
    pub archived: u64,
    /// All reports.
    pub total: u64,
}

impl ReportStateCounts {
    /// Builds the counts from `(state, count)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ReportState, u64)>,
    {
        let mut counts = Self::default();
        for (state, n) in pairs {
            let slot = match state {
                ReportState::Todo => &mut counts.todo,
                ReportState::Pending => &mut counts.pending,
                ReportState::Submitted => &mut counts.submitted,
                ReportState::Rejected => &mut counts.rejected,
                ReportState::Completed => &mut counts.completed,
                ReportState::Archived => &mut counts.archived,
            };
            *slot += n;
            counts.total += n;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts() {
        let counts = ReportStateCounts::from_pairs([
            (ReportState::Pending, 3),
            (ReportState::Completed, 5),
            (ReportState::Pending, 1),
        ]);
        assert_eq!(counts.pending, 4);
        assert_eq!(counts.completed, 5);
        assert_eq!(counts.total, 9);
        assert_eq!(counts.archived, 0);
    }
}
