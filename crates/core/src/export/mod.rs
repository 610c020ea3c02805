//! CSV export of monthly reports and the import template.

pub mod error;
pub mod report;
pub mod template;

pub use error::ExportError;
pub use report::{REPORT_EXPORT_COLUMNS, ReportExportRow, disaggregation_columns, write_report_csv};
pub use template::{TemplateExample, template_columns, write_import_template};
