//! 5W dashboard aggregates.
//!
//! The persistence layer loads flat [`ReachRecord`]s for submitted and
//! completed reports; this module folds them into the dashboard figures.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{HOUSEHOLDS_MARKER, summarize};
pub use types::{FiveWSummary, MonthlyReach, ReachRecord, ReportStateCounts};
