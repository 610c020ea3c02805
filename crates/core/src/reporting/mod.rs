//! Monthly report lifecycle for ReportHub.
//!
//! This module implements the report period state machine, the reporting
//! calendar, the carry-over rules used by copy-forward, and the entry
//! template for disaggregated values.
//!
//! # Modules
//!
//! - `types` - Report domain types (ReportState, BeneficiaryStatus, ReportAction)
//! - `error` - Reporting-specific error types
//! - `service` - State transition logic
//! - `period` - Reporting months and report titles
//! - `carry` - Copy-forward carry-over policy
//! - `entry` - Disaggregation entry templates

pub mod carry;
pub mod entry;
pub mod error;
pub mod period;
pub mod service;
pub mod types;

#[cfg(test)]
mod period_props;
#[cfg(test)]
mod service_props;

pub use carry::{CarryOver, DisaggregationValues};
pub use entry::{
    DisaggregationRef, EntryInput, EntryRow, ExistingEntry, build_entry_template, validate_entries,
};
pub use error::ReportError;
pub use period::{ReportingMonth, ReportingPeriod};
pub use service::{ReportLifecycle, ReportingPolicy};
pub use types::{BeneficiaryStatus, PlanReportCompleteness, ReportAction, ReportState};
