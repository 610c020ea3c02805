//! CSV reading and column layout.

use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::import::error::{ImportError, RowError};

/// Columns every import row must fill.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "indicator",
    "activity_domain",
    "activity_type",
    "admin0pcode",
    "admin1pcode",
    "admin2pcode",
];

/// Optional columns of a monthly report import.
pub const REPORT_OPTIONAL_COLUMNS: [&str; 5] = [
    "activity_detail",
    "zone",
    "location_type",
    "facility_site_type",
    "beneficiary_status",
];

/// Optional columns of an activity plan import.
pub const PLAN_OPTIONAL_COLUMNS: [&str; 14] = [
    "activity_detail",
    "zone",
    "location_type",
    "facility_site_type",
    "beneficiary",
    "hrp_beneficiary",
    "beneficiary_category",
    "description",
    "implementing_partner_code",
    "facility_name",
    "facility_id",
    "facility_lat",
    "facility_long",
    "nhs_code",
];

/// Older templates name the zone column after its admin level.
const ZONE_ALIAS: &str = "admin3pcode";

/// One data row of an uploaded sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// Line of the row in the uploaded file. The header is line 1.
    pub line: usize,
    values: HashMap<String, String>,
}

impl SheetRow {
    /// Builds a row from header/value pairs.
    pub fn from_pairs<K, V, I>(line: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            line,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Line number shown to users.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Trimmed value of a column, `None` when absent or blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = self.values.get(column).map(|v| v.trim()).filter(|v| !v.is_empty());
        if value.is_none() && column == "zone" {
            return self.get(ZONE_ALIAS);
        }
        value
    }

    /// Row errors for every blank required column.
    #[must_use]
    pub fn missing_required(&self) -> Vec<RowError> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|column| self.get(column).is_none())
            .map(|column| RowError {
                row: self.line(),
                message: format!("Row [{}]: {} is missing.", self.line(), capitalize(column)),
            })
            .collect()
    }

    /// Parses a beneficiary count.
    ///
    /// Blank means absent. Spreadsheet tools often write whole numbers as
    /// `12.0`, which is accepted.
    pub fn count(&self, column: &str) -> Result<Option<i64>, RowError> {
        let Some(raw) = self.get(column) else {
            return Ok(None);
        };
        raw.parse::<Decimal>()
            .ok()
            .filter(|d| d.fract().is_zero() && !d.is_sign_negative())
            .and_then(|d| d.to_i64())
            .map(Some)
            .ok_or_else(|| RowError {
                row: self.line(),
                message: format!(
                    "Row {}: '{column}' must be a non-negative whole number, got '{raw}'.",
                    self.line()
                ),
            })
    }
}

/// A parsed upload.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Trimmed header names.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Returns true if the header contains the column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
            || (column == "zone" && self.headers.iter().any(|h| h == ZONE_ALIAS))
    }
}

/// Reads an uploaded CSV file.
///
/// Header names are trimmed and matched exactly. Rows that are entirely
/// blank are dropped.
pub fn read_sheet<R: Read>(reader: R, max_rows: usize) -> Result<Sheet, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| (*c).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        if rows.len() == max_rows {
            return Err(ImportError::TooManyRows(max_rows));
        }
        // Blank and multi-line records make the data row count drift from the file line.
        let line = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(rows.len() + 2);
        rows.push(SheetRow::from_pairs(
            line,
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string())),
        ));
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(Sheet { headers, rows })
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(column: &str) -> String {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Result of the resolution phase.
#[derive(Debug, Clone)]
pub struct ImportOutcome<T> {
    /// Rows ready to be written.
    pub rows: Vec<T>,
    /// Rows that were skipped and why.
    pub errors: Vec<RowError>,
    /// Data rows in the file.
    pub total_rows: usize,
}

impl<T> ImportOutcome<T> {
    /// Number of skipped rows.
    #[must_use]
    pub fn skipped_rows(&self) -> usize {
        self.total_rows - self.rows.len()
    }

    /// Summary returned to the caller once `imported_rows` are written.
    #[must_use]
    pub fn summary(&self, imported_rows: usize) -> ImportSummary {
        ImportSummary {
            imported_rows,
            skipped_rows: self.total_rows - imported_rows,
            errors: self.errors.clone(),
        }
    }
}

/// Import result reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows written.
    pub imported_rows: usize,
    /// Rows not written.
    pub skipped_rows: usize,
    /// Why rows were skipped.
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "indicator,activity_domain,activity_type,admin0pcode,admin1pcode,admin2pcode,Girls(0-5)\n";

    #[test]
    fn test_read_sheet() {
        let data = format!(
            "{HEADER}People reached,WASH-HYG,HYG-KIT,AF,AF01,AF0101, 10 \n,,,,,,\nPeople reached,WASH-HYG,HYG-KIT,AF,,AF0101,\n"
        );
        let sheet = read_sheet(data.as_bytes(), 100).unwrap();

        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.has_column("Girls(0-5)"));
        assert_eq!(sheet.rows[0].get("admin1pcode"), Some("AF01"));
        assert_eq!(sheet.rows[0].count("Girls(0-5)").unwrap(), Some(10));
        assert_eq!(sheet.rows[0].line(), 2);
        assert_eq!(sheet.rows[1].line(), 4);
    }

    #[test]
    fn test_row_errors_name_the_file_line() {
        let data = format!(
            "{HEADER},,,,,,\n,,,,,,\nPeople reached,WASH-HYG,HYG-KIT,AF,,AF0101,1\n"
        );
        let sheet = read_sheet(data.as_bytes(), 100).unwrap();
        let errors = sheet.rows[0].missing_required();

        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(errors[0].row, 4);
        assert_eq!(errors[0].message, "Row [4]: Admin1pcode is missing.");
    }

    #[test]
    fn test_missing_required_cell() {
        let data = format!("{HEADER}People reached,WASH-HYG,HYG-KIT,AF,,AF0101,5\n");
        let sheet = read_sheet(data.as_bytes(), 100).unwrap();
        let errors = sheet.rows[0].missing_required();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[0].message, "Row [2]: Admin1pcode is missing.");
    }

    #[test]
    fn test_missing_header_column() {
        let data = "indicator,activity_domain\nA,B\n";
        match read_sheet(data.as_bytes(), 100) {
            Err(ImportError::MissingColumns(columns)) => {
                assert_eq!(
                    columns,
                    vec!["activity_type", "admin0pcode", "admin1pcode", "admin2pcode"]
                );
            }
            other => panic!("Expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_oversized_files() {
        assert!(matches!(read_sheet(HEADER.as_bytes(), 10), Err(ImportError::Empty)));

        let data = format!("{HEADER}a,b,c,d,e,f,1\na,b,c,d,e,f,2\n");
        assert!(matches!(
            read_sheet(data.as_bytes(), 1),
            Err(ImportError::TooManyRows(1))
        ));
    }

    #[test]
    fn test_counts() {
        let row = SheetRow::from_pairs(2, [("a", "12.0"), ("b", "-1"), ("c", "2.5"), ("d", "")]);
        assert_eq!(row.count("a").unwrap(), Some(12));
        assert!(row.count("b").is_err());
        assert!(row.count("c").is_err());
        assert_eq!(row.count("d").unwrap(), None);
    }

    #[test]
    fn test_zone_alias() {
        let row = SheetRow::from_pairs(2, [("admin3pcode", "AF0101001")]);
        assert_eq!(row.get("zone"), Some("AF0101001"));
    }

    #[test]
    fn test_summary() {
        let outcome = ImportOutcome {
            rows: vec![1, 2],
            errors: vec![RowError {
                row: 4,
                message: "bad".into(),
            }],
            total_rows: 3,
        };
        assert_eq!(outcome.skipped_rows(), 1);
        let summary = outcome.summary(2);
        assert_eq!(summary.imported_rows, 2);
        assert_eq!(summary.skipped_rows, 1);
    }
}
