//! Reporting domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use reporthub_shared::types::ActivityPlanReportId;

/// State of a project monthly report.
///
/// The valid transitions are:
/// - Todo / Pending / Rejected → Submitted or Completed (submit)
/// - Submitted → Completed (approve)
/// - Submitted / Completed → Rejected (reject)
/// - any non-archived → Archived (archive)
/// - Archived → Todo (unarchive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportState {
    /// Current period, still open for data entry.
    Todo,
    /// Past period waiting for submission.
    Pending,
    /// Submitted and waiting for a cluster lead.
    Submitted,
    /// Sent back by a cluster lead.
    Rejected,
    /// Accepted; source of the next copy-forward.
    Completed,
    /// Hidden; kept for the record.
    Archived,
}

impl ReportState {
    /// All states, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Todo,
        Self::Pending,
        Self::Submitted,
        Self::Rejected,
        Self::Completed,
        Self::Archived,
    ];

    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parses a state from a string, accepting the short verb forms
    /// (`submit`, `reject`, `complete`, `archive`) found in older data.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "pending" => Some(Self::Pending),
            "submitted" | "submit" | "submited" => Some(Self::Submitted),
            "rejected" | "reject" => Some(Self::Rejected),
            "completed" | "complete" => Some(Self::Completed),
            "archived" | "archive" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Returns true if report entries can be added, changed or imported.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Todo | Self::Pending | Self::Rejected)
    }

    /// Returns true while the report still needs action from its project.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Submitted)
    }

    /// Returns true if the report counts towards dashboards.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Submitted | Self::Completed)
    }
}

impl fmt::Display for ReportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether people at a reported location are reached for the first time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryStatus {
    /// Reached for the first time in this period.
    #[default]
    NewBeneficiary,
    /// Carried over from an earlier period.
    ExistingBeneficiaries,
}

impl BeneficiaryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewBeneficiary => "new_beneficiary",
            Self::ExistingBeneficiaries => "existing_beneficiaries",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "new_beneficiary" | "new_beneficiaries" | "new" => Some(Self::NewBeneficiary),
            "existing_beneficiaries" | "existing_beneficiary" | "existing" => {
                Some(Self::ExistingBeneficiaries)
            }
            _ => None,
        }
    }
}

impl fmt::Display for BeneficiaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number of target location reports under one activity plan report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanReportCompleteness {
    /// Activity plan report.
    pub plan_report_id: ActivityPlanReportId,
    /// Target location reports under it.
    pub location_reports: usize,
}

/// A validated report transition with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportAction {
    /// Submit a report.
    Submit {
        /// `Completed` without review, `Submitted` when approval is required.
        new_state: ReportState,
        /// When the report was submitted.
        submitted_on: DateTime<Utc>,
        /// Set when no review is needed.
        approved_on: Option<DateTime<Utc>>,
    },
    /// Approve a submitted report.
    Approve {
        /// Always `Completed`.
        new_state: ReportState,
        /// When the report was approved.
        approved_on: DateTime<Utc>,
    },
    /// Send a report back.
    Reject {
        /// Always `Rejected`.
        new_state: ReportState,
        /// When the report was rejected.
        rejected_on: DateTime<Utc>,
        /// Stored in the report comments.
        reason: String,
    },
    /// Archive a report.
    Archive {
        /// Always `Archived`.
        new_state: ReportState,
    },
    /// Restore an archived report.
    Unarchive {
        /// Always `Todo`.
        new_state: ReportState,
    },
}

impl ReportAction {
    /// Returns the new state resulting from this action.
    #[must_use]
    pub fn new_state(&self) -> ReportState {
        match self {
            Self::Submit { new_state, .. }
            | Self::Approve { new_state, .. }
            | Self::Reject { new_state, .. }
            | Self::Archive { new_state }
            | Self::Unarchive { new_state } => *new_state,
        }
    }

    /// Value of the report's `is_active` flag after the action.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Archive { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for state in ReportState::ALL {
            assert_eq!(ReportState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn test_state_parse_legacy_forms() {
        assert_eq!(ReportState::parse("submited"), Some(ReportState::Submitted));
        assert_eq!(ReportState::parse("Complete"), Some(ReportState::Completed));
        assert_eq!(ReportState::parse("archive"), Some(ReportState::Archived));
        assert_eq!(ReportState::parse("reject"), Some(ReportState::Rejected));
        assert_eq!(ReportState::parse("done"), None);
    }

    #[test]
    fn test_state_flags() {
        assert!(ReportState::Todo.is_editable());
        assert!(ReportState::Pending.is_editable());
        assert!(ReportState::Rejected.is_editable());
        assert!(!ReportState::Submitted.is_editable());
        assert!(!ReportState::Completed.is_editable());
        assert!(!ReportState::Archived.is_editable());

        assert!(ReportState::Pending.is_open());
        assert!(ReportState::Submitted.is_open());
        assert!(!ReportState::Todo.is_open());

        assert!(ReportState::Completed.is_reported());
        assert!(!ReportState::Pending.is_reported());
    }

    #[test]
    fn test_beneficiary_status_parse() {
        assert_eq!(
            BeneficiaryStatus::parse("new_beneficiary"),
            Some(BeneficiaryStatus::NewBeneficiary)
        );
        assert_eq!(
            BeneficiaryStatus::parse("Existing Beneficiaries"),
            Some(BeneficiaryStatus::ExistingBeneficiaries)
        );
        assert_eq!(BeneficiaryStatus::parse("returnee"), None);
        assert_eq!(BeneficiaryStatus::default(), BeneficiaryStatus::NewBeneficiary);
    }

    #[test]
    fn test_archive_action_deactivates() {
        let archive = ReportAction::Archive {
            new_state: ReportState::Archived,
        };
        assert!(!archive.is_active());
        let unarchive = ReportAction::Unarchive {
            new_state: ReportState::Todo,
        };
        assert!(unarchive.is_active());
        assert_eq!(unarchive.new_state(), ReportState::Todo);
    }
}
