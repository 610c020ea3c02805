//! Spreadsheet (CSV) import.
//!
//! Imports run in two phases. Resolution is read-only: every row is checked
//! against a preloaded [`ReferenceIndex`] and either resolved to ids or
//! turned into row errors. The persistence layer then applies the resolved
//! rows in one transaction.
//!
//! # Modules
//!
//! - `sheet` - CSV reading and column layout
//! - `reference` - Lookup tables for codes, names and aliases
//! - `report` - Monthly report rows
//! - `plan` - Activity plan rows
//! - `error` - File-level import errors

pub mod error;
pub mod plan;
pub mod reference;
pub mod report;
mod rows;
pub mod sheet;

pub use error::{ImportError, RowError};
pub use plan::{
    PlanImportContext, PlannedActivity, ResolvedPlanRow, group_by_plan, resolve_plan_rows,
};
pub use reference::{
    ActivityPlanRef, ActivityTypeRef, AliasKind, DisaggregationColumn, IndicatorRef, PlanKey,
    ReferenceIndex, ResolvedLocations, TargetLocationRef,
};
pub use report::{ReportImportContext, ResolvedReportRow, resolve_report_rows};
pub use sheet::{
    ImportOutcome, ImportSummary, REQUIRED_COLUMNS, Sheet, SheetRow, read_sheet,
};
