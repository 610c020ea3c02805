//! Monthly report import template.

use std::io::Write;

use crate::export::error::ExportError;
use crate::import::sheet::{REPORT_OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
use crate::reporting::BeneficiaryStatus;

/// A planned target location, written as an example row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateExample {
    /// Indicator name.
    pub indicator: String,
    /// Activity domain code.
    pub activity_domain: String,
    /// Activity type code.
    pub activity_type: String,
    /// Activity detail code.
    pub activity_detail: Option<String>,
    /// Country pcode.
    pub admin0pcode: String,
    /// Province pcode.
    pub admin1pcode: String,
    /// District pcode.
    pub admin2pcode: String,
    /// Zone pcode.
    pub zone: Option<String>,
    /// Location type name.
    pub location_type: Option<String>,
    /// Facility site type name.
    pub facility_site_type: Option<String>,
}

/// Header of the template: required, optional, then disaggregation columns.
#[must_use]
pub fn template_columns(disaggregations: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .chain(REPORT_OPTIONAL_COLUMNS.iter())
        .map(|c| (*c).to_string())
        .chain(disaggregations.iter().cloned())
        .collect()
}

/// Writes the template with one example row per planned target location.
///
/// Disaggregation cells are left blank for the user to fill in.
pub fn write_import_template<W: Write>(
    writer: W,
    disaggregations: &[String],
    examples: &[TemplateExample],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(template_columns(disaggregations))?;

    for example in examples {
        let mut cells = vec![
            example.indicator.clone(),
            example.activity_domain.clone(),
            example.activity_type.clone(),
            example.admin0pcode.clone(),
            example.admin1pcode.clone(),
            example.admin2pcode.clone(),
            example.activity_detail.clone().unwrap_or_default(),
            example.zone.clone().unwrap_or_default(),
            example.location_type.clone().unwrap_or_default(),
            example.facility_site_type.clone().unwrap_or_default(),
            BeneficiaryStatus::NewBeneficiary.as_str().to_string(),
        ];
        cells.resize(cells.len() + disaggregations.len(), String::new());
        wtr.write_record(&cells)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::read_sheet;

    #[test]
    fn test_columns() {
        let columns = template_columns(&["Girls(0-5)".into()]);
        assert_eq!(columns.len(), 12);
        assert_eq!(columns[0], "indicator");
        assert_eq!(columns[11], "Girls(0-5)");
    }

    #[test]
    fn test_template_reads_back_as_import() {
        let example = TemplateExample {
            indicator: "People receiving hygiene kits".into(),
            activity_domain: "WASH-HYG".into(),
            activity_type: "HYG-KIT".into(),
            admin0pcode: "AF".into(),
            admin1pcode: "AF01".into(),
            admin2pcode: "AF0102".into(),
            ..TemplateExample::default()
        };
        let mut out = Vec::new();
        write_import_template(&mut out, &["Girls(0-5)".into()], &[example]).unwrap();

        let sheet = read_sheet(out.as_slice(), 10).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert!(sheet.rows[0].missing_required().is_empty());
        assert_eq!(sheet.rows[0].get("beneficiary_status"), Some("new_beneficiary"));
        assert_eq!(sheet.rows[0].get("Girls(0-5)"), None);
    }
}
