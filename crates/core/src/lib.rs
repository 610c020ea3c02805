//! Core reporting logic for ReportHub.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, state machines, validation rules, and aggregations live here.
//!
//! # Modules
//!
//! - `location` - Administrative location tree and its level invariant
//! - `planning` - Project lifecycle and planning-tree duplication rules
//! - `reporting` - Monthly report state machine, reporting periods, carry-over
//! - `rollup` - Target / reached aggregation over disaggregation rows
//! - `import` - CSV import schema, per-row validation and reference resolution
//! - `export` - CSV export and import template writers
//! - `dashboard` - 5W dashboard aggregates
//! - `fields` - Dynamic report-field schemas
//! - `access` - Cluster lead and project permission rules
//! - `error` - Conversion of domain errors into `AppError`

pub mod access;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod fields;
pub mod import;
pub mod location;
pub mod planning;
pub mod reporting;
pub mod rollup;
