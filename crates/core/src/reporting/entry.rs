//! Disaggregation entry rows for a target location report.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reporthub_shared::types::DisaggregationId;

use crate::reporting::carry::DisaggregationValues;
use crate::reporting::error::ReportError;

/// A disaggregation configured for an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisaggregationRef {
    /// Disaggregation id.
    pub id: DisaggregationId,
    /// Display name, e.g. `Girls(0-5)`.
    pub name: String,
}

/// A value already stored for a target location report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingEntry {
    /// Stored row id.
    pub id: Uuid,
    /// Disaggregation the value is for.
    pub disaggregation: DisaggregationRef,
    /// Stored values.
    pub values: DisaggregationValues,
}

/// One editable row of the entry template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// Stored row id, `None` for new rows.
    pub id: Option<Uuid>,
    /// Disaggregation, `None` for free rows.
    pub disaggregation_id: Option<DisaggregationId>,
    /// Disaggregation name.
    pub disaggregation_name: Option<String>,
    /// Planned people.
    pub target: i64,
    /// People still needing assistance.
    pub target_required: i64,
    /// People reached.
    pub reached: i64,
}

/// A value submitted for a target location report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    /// Disaggregation the value is for.
    pub disaggregation_id: DisaggregationId,
    /// Planned people.
    #[serde(default)]
    pub target: i64,
    /// People still needing assistance.
    #[serde(default)]
    pub target_required: i64,
    /// People reached.
    #[serde(default)]
    pub reached: i64,
}

impl EntryInput {
    /// The submitted numbers.
    #[must_use]
    pub const fn values(&self) -> DisaggregationValues {
        DisaggregationValues {
            target: self.target,
            target_required: self.target_required,
            reached: self.reached,
        }
    }
}

/// Builds the rows shown when editing a target location report.
///
/// Existing values come first, then one blank row for every configured
/// disaggregation without a value, then `extra` free rows.
#[must_use]
pub fn build_entry_template(
    configured: &[DisaggregationRef],
    existing: &[ExistingEntry],
    extra: usize,
) -> Vec<EntryRow> {
    let present: HashSet<DisaggregationId> =
        existing.iter().map(|e| e.disaggregation.id).collect();

    let mut rows: Vec<EntryRow> = existing
        .iter()
        .map(|e| EntryRow {
            id: Some(e.id),
            disaggregation_id: Some(e.disaggregation.id),
            disaggregation_name: Some(e.disaggregation.name.clone()),
            target: e.values.target,
            target_required: e.values.target_required,
            reached: e.values.reached,
        })
        .collect();

    let mut seen = present;
    for disaggregation in configured {
        if seen.insert(disaggregation.id) {
            rows.push(EntryRow {
                disaggregation_id: Some(disaggregation.id),
                disaggregation_name: Some(disaggregation.name.clone()),
                ..EntryRow::default()
            });
        }
    }

    rows.extend(std::iter::repeat_with(EntryRow::default).take(extra));
    rows
}

/// Checks submitted values against the indicator's disaggregations.
pub fn validate_entries(
    configured: &[DisaggregationId],
    entries: &[EntryInput],
) -> Result<(), ReportError> {
    let allowed: HashSet<&DisaggregationId> = configured.iter().collect();
    let mut seen = HashSet::new();

    for entry in entries {
        if !allowed.contains(&entry.disaggregation_id) {
            return Err(ReportError::UnknownDisaggregation(
                entry.disaggregation_id.into_inner(),
            ));
        }
        if !seen.insert(entry.disaggregation_id) {
            return Err(ReportError::DuplicateDisaggregation(
                entry.disaggregation_id.into_inner(),
            ));
        }
        check_non_negative(entry.values())?;
    }
    Ok(())
}

fn check_non_negative(values: DisaggregationValues) -> Result<(), ReportError> {
    for (field, value) in [
        ("target", values.target),
        ("target_required", values.target_required),
        ("reached", values.reached),
    ] {
        if value < 0 {
            return Err(ReportError::NegativeValue { field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disaggregation(name: &str) -> DisaggregationRef {
        DisaggregationRef {
            id: DisaggregationId::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_template_orders_existing_missing_extra() {
        let girls = disaggregation("Girls(0-5)");
        let boys = disaggregation("Boys(0-5)");
        let women = disaggregation("Women(18+)");
        let existing = vec![ExistingEntry {
            id: Uuid::new_v4(),
            disaggregation: boys.clone(),
            values: DisaggregationValues {
                target: 10,
                target_required: 2,
                reached: 8,
            },
        }];

        let rows = build_entry_template(&[girls.clone(), boys.clone(), women.clone()], &existing, 2);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].disaggregation_id, Some(boys.id));
        assert_eq!(rows[0].reached, 8);
        assert_eq!(rows[1].disaggregation_name.as_deref(), Some("Girls(0-5)"));
        assert_eq!(rows[1].id, None);
        assert_eq!(rows[2].disaggregation_id, Some(women.id));
        assert_eq!(rows[3], EntryRow::default());
        assert_eq!(rows[4], EntryRow::default());
    }

    #[test]
    fn test_template_without_extra_rows() {
        let rows = build_entry_template(&[disaggregation("Men(18+)")], &[], 0);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_validate_entries() {
        let girls = DisaggregationId::new();
        let input = |id, reached| EntryInput {
            disaggregation_id: id,
            target: 10,
            target_required: 0,
            reached,
        };

        assert!(validate_entries(&[girls], &[input(girls, 4)]).is_ok());
        assert!(matches!(
            validate_entries(&[girls], &[input(girls, -1)]),
            Err(ReportError::NegativeValue { field: "reached" })
        ));
        assert!(matches!(
            validate_entries(&[girls], &[input(DisaggregationId::new(), 1)]),
            Err(ReportError::UnknownDisaggregation(_))
        ));
        assert!(matches!(
            validate_entries(&[girls], &[input(girls, 1), input(girls, 2)]),
            Err(ReportError::DuplicateDisaggregation(_))
        ));
    }
}
