//! Per-activity-type report fields.
//!
//! An activity type may carry a JSON list of field definitions. The list is
//! parsed into a [`FieldSchema`], which checks and normalizes the
//! `report_fields` of activity plan reports.

pub mod error;
pub mod schema;

pub use error::{FieldError, FieldViolation};
pub use schema::{FieldDef, FieldKind, FieldSchema, FieldValue};
