//! Monthly report CSV export.
//!
//! One line per target location report. The fixed columns are followed by
//! one column per disaggregation name, sorted, holding the reached value.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::export::error::ExportError;
use crate::reporting::ReportingPeriod;

/// Fixed columns of the report export, in order.
pub const REPORT_EXPORT_COLUMNS: [&str; 38] = [
    "project_code",
    "report_title",
    "clusters",
    "organization",
    "organization_type",
    "implementing_partners",
    "project_hrp_code",
    "project_title",
    "project_start_date",
    "project_end_date",
    "project_status",
    "report_status",
    "report_month_number",
    "report_month",
    "report_year",
    "report_period",
    "admin0pcode",
    "admin0name",
    "admin1pcode",
    "admin1name",
    "admin2pcode",
    "admin2name",
    "zone",
    "location_type",
    "facility_site_type",
    "facility_name",
    "facility_id",
    "beneficiary_status",
    "activity_domain_code",
    "activity_domain_name",
    "activity_type_code",
    "activity_type_name",
    "activity_detail_code",
    "activity_detail_name",
    "indicator",
    "units",
    "no_of_transfers",
    "target_achieved",
];

/// One exported target location report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportExportRow {
    /// Project code.
    pub project_code: String,
    /// Project title.
    pub project_title: String,
    /// Project HRP code.
    pub project_hrp_code: Option<String>,
    /// Project start.
    pub project_start_date: Option<NaiveDate>,
    /// Project end.
    pub project_end_date: Option<NaiveDate>,
    /// Project state.
    pub project_status: String,
    /// Cluster codes, comma separated.
    pub clusters: String,
    /// Organization code.
    pub organization: String,
    /// Organization type.
    pub organization_type: Option<String>,
    /// Implementing partner codes, comma separated.
    pub implementing_partners: String,
    /// Report state.
    pub report_status: String,
    /// Report period start.
    pub report_from: Option<NaiveDate>,
    /// Report period end.
    pub report_to: Option<NaiveDate>,
    /// Country pcode.
    pub admin0pcode: String,
    /// Country name.
    pub admin0name: String,
    /// Province pcode.
    pub admin1pcode: String,
    /// Province name.
    pub admin1name: String,
    /// District pcode.
    pub admin2pcode: String,
    /// District name.
    pub admin2name: String,
    /// Zone name.
    pub zone: Option<String>,
    /// Location type.
    pub location_type: Option<String>,
    /// Facility site type.
    pub facility_site_type: Option<String>,
    /// Facility name.
    pub facility_name: Option<String>,
    /// Facility id.
    pub facility_id: Option<String>,
    /// New or existing beneficiaries.
    pub beneficiary_status: String,
    /// Activity domain code.
    pub activity_domain_code: String,
    /// Activity domain name.
    pub activity_domain_name: String,
    /// Activity type code.
    pub activity_type_code: String,
    /// Activity type name.
    pub activity_type_name: String,
    /// Activity detail code.
    pub activity_detail_code: Option<String>,
    /// Activity detail name.
    pub activity_detail_name: Option<String>,
    /// Indicator name.
    pub indicator: String,
    /// Units.
    pub units: Option<i64>,
    /// Number of transfers.
    pub no_of_transfers: Option<i32>,
    /// Target achieved of the activity plan report.
    pub target_achieved: i64,
    /// Reached people per disaggregation name.
    pub reached: BTreeMap<String, i64>,
}

fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl ReportExportRow {
    fn report_date(&self) -> Option<NaiveDate> {
        self.report_from.or(self.report_to)
    }

    /// Cells for [`REPORT_EXPORT_COLUMNS`].
    #[must_use]
    pub fn fixed_cells(&self) -> Vec<String> {
        let report_date = self.report_date();
        vec![
            self.project_code.clone(),
            ReportingPeriod::title(self.report_from, self.report_to).unwrap_or_default(),
            self.clusters.clone(),
            self.organization.clone(),
            opt(self.organization_type.as_ref()),
            self.implementing_partners.clone(),
            opt(self.project_hrp_code.as_ref()),
            self.project_title.clone(),
            date(self.project_start_date),
            date(self.project_end_date),
            self.project_status.clone(),
            self.report_status.clone(),
            opt(report_date.map(|d| d.month()).as_ref()),
            report_date.map(|d| d.format("%B").to_string()).unwrap_or_default(),
            opt(report_date.map(|d| d.year()).as_ref()),
            format!("{} - {}", date(self.report_from), date(self.report_to)),
            self.admin0pcode.clone(),
            self.admin0name.clone(),
            self.admin1pcode.clone(),
            self.admin1name.clone(),
            self.admin2pcode.clone(),
            self.admin2name.clone(),
            opt(self.zone.as_ref()),
            opt(self.location_type.as_ref()),
            opt(self.facility_site_type.as_ref()),
            opt(self.facility_name.as_ref()),
            opt(self.facility_id.as_ref()),
            self.beneficiary_status.clone(),
            self.activity_domain_code.clone(),
            self.activity_domain_name.clone(),
            self.activity_type_code.clone(),
            self.activity_type_name.clone(),
            opt(self.activity_detail_code.as_ref()),
            opt(self.activity_detail_name.as_ref()),
            self.indicator.clone(),
            opt(self.units.as_ref()),
            opt(self.no_of_transfers.as_ref()),
            self.target_achieved.to_string(),
        ]
    }
}

/// Distinct disaggregation names across rows, sorted.
#[must_use]
pub fn disaggregation_columns(rows: &[ReportExportRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|r| r.reached.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Writes the export. A header is written even when there are no rows.
pub fn write_report_csv<W: Write>(writer: W, rows: &[ReportExportRow]) -> Result<(), ExportError> {
    let disaggregations = disaggregation_columns(rows);
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(
        REPORT_EXPORT_COLUMNS
            .iter()
            .copied()
            .chain(disaggregations.iter().map(String::as_str)),
    )?;

    for row in rows {
        let mut cells = row.fixed_cells();
        cells.extend(
            disaggregations
                .iter()
                .map(|name| opt(row.reached.get(name))),
        );
        wtr.write_record(&cells)?;
    }

    wtr.flush()?;
    Ok(())
}
