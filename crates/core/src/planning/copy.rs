//! Duplication rules for the planned tree.

use crate::planning::types::{ProjectState, ProjectTransition};

/// Prefix put in front of the title and code of a duplicated project.
pub const DUPLICATE_PREFIX: &str = "DUPLICATED-";

/// Rules applied when cloning a project, an activity plan or a target location.
pub struct CopyRules;

impl CopyRules {
    /// State and active flag every copied row starts with.
    #[must_use]
    pub const fn copied_row() -> ProjectTransition {
        ProjectTransition {
            new_state: ProjectState::Draft,
            is_active: true,
        }
    }

    /// Title of a duplicated project.
    #[must_use]
    pub fn duplicate_title(title: &str) -> String {
        format!("{DUPLICATE_PREFIX}{title}")
    }

    /// Code candidate for a duplicated project.
    ///
    /// Codes are unique, so callers try `attempt = 0, 1, 2, ...` until one is free.
    #[must_use]
    pub fn duplicate_code(code: &str, attempt: u32) -> String {
        if attempt == 0 {
            format!("{DUPLICATE_PREFIX}{code}")
        } else {
            format!("{DUPLICATE_PREFIX}{code}-{attempt}")
        }
    }
}
