//! Planning domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use reporthub_shared::types::ActivityPlanId;

/// State shared by projects, activity plans and target locations.
///
/// - Draft → InProgress (submit)
/// - InProgress → Completed (complete)
/// - any non-archived → Archived (archive)
/// - Archived → Draft (unarchive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectState {
    /// Being planned; freely editable.
    #[serde(rename = "draft")]
    Draft,
    /// Submitted; monthly reports may be created.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Closed after its reporting finished.
    #[serde(rename = "completed")]
    Completed,
    /// Hidden from day-to-day work.
    #[serde(rename = "archived")]
    Archived,
}

impl ProjectState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "in-progress" | "in_progress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            "archived" | "archive" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Returns true if the planned tree can still be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::InProgress)
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many target locations each activity plan of a project has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    /// Activity plan.
    pub activity_plan_id: ActivityPlanId,
    /// Number of target locations under it.
    pub target_locations: usize,
}

/// Outcome of a project transition, applied to the whole planned tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectTransition {
    /// State written to the project, its plans and target locations.
    pub new_state: ProjectState,
    /// Value written to `is_active` on every row.
    pub is_active: bool,
}
