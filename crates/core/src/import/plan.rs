//! Activity plan import rows.
//!
//! Each row describes one target location. Rows sharing activity domain,
//! type, detail and indicator become one activity plan.

use std::collections::HashMap;

use uuid::Uuid;

use reporthub_shared::types::DisaggregationId;

use crate::import::reference::{DisaggregationColumn, PlanKey, ReferenceIndex, ResolvedLocations};
use crate::import::rows::{RowErrors, optional_ref, resolve_activity, resolve_locations};
use crate::import::sheet::{ImportOutcome, Sheet, SheetRow};

/// The project data a plan import is checked against.
#[derive(Debug, Clone, Default)]
pub struct PlanImportContext {
    /// Activity domains selected on the project.
    pub activity_domain_ids: Vec<Uuid>,
    /// Disaggregations of the project's clusters.
    pub disaggregations: Vec<DisaggregationColumn>,
}

/// A target location row ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlanRow {
    /// Spreadsheet line.
    pub line: usize,
    /// Activity plan identity.
    pub key: PlanKey,
    /// Beneficiary type.
    pub beneficiary_id: Option<Uuid>,
    /// HRP beneficiary type.
    pub hrp_beneficiary_id: Option<Uuid>,
    /// Beneficiary category.
    pub beneficiary_category: Option<String>,
    /// Plan description.
    pub description: Option<String>,
    /// Location chain.
    pub locations: ResolvedLocations,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// Implementing partner organization.
    pub implementing_partner_id: Option<Uuid>,
    /// Facility name.
    pub facility_name: Option<String>,
    /// Facility id.
    pub facility_id: Option<String>,
    /// Facility latitude, stored as text.
    pub facility_lat: Option<String>,
    /// Facility longitude, stored as text.
    pub facility_long: Option<String>,
    /// NHS code.
    pub nhs_code: Option<String>,
    /// Target per disaggregation.
    pub targets: Vec<(DisaggregationId, i64)>,
}

/// One activity plan with its target locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedActivity {
    /// Activity plan identity.
    pub key: PlanKey,
    /// Beneficiary type, from the first row.
    pub beneficiary_id: Option<Uuid>,
    /// HRP beneficiary type, from the first row.
    pub hrp_beneficiary_id: Option<Uuid>,
    /// Beneficiary category, from the first row.
    pub beneficiary_category: Option<String>,
    /// Description, from the first row.
    pub description: Option<String>,
    /// Target location rows.
    pub rows: Vec<ResolvedPlanRow>,
}

/// Resolves every row of an activity plan upload.
#[must_use]
pub fn resolve_plan_rows(
    sheet: &Sheet,
    index: &ReferenceIndex,
    context: &PlanImportContext,
) -> ImportOutcome<ResolvedPlanRow> {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for row in &sheet.rows {
        match resolve_row(row, index, context) {
            Ok(resolved) => rows.push(resolved),
            Err(row_errors) => errors.extend(row_errors.into_vec()),
        }
    }

    ImportOutcome {
        rows,
        errors,
        total_rows: sheet.rows.len(),
    }
}

/// Groups rows into activity plans, in order of first appearance.
#[must_use]
pub fn group_by_plan(rows: Vec<ResolvedPlanRow>) -> Vec<PlannedActivity> {
    let mut positions: HashMap<PlanKey, usize> = HashMap::new();
    let mut plans: Vec<PlannedActivity> = Vec::new();

    for row in rows {
        if let Some(&position) = positions.get(&row.key) {
            plans[position].rows.push(row);
        } else {
            positions.insert(row.key, plans.len());
            plans.push(PlannedActivity {
                key: row.key,
                beneficiary_id: row.beneficiary_id,
                hrp_beneficiary_id: row.hrp_beneficiary_id,
                beneficiary_category: row.beneficiary_category.clone(),
                description: row.description.clone(),
                rows: vec![row],
            });
        }
    }
    plans
}

fn text(row: &SheetRow, column: &str) -> Option<String> {
    row.get(column).map(str::to_string)
}

fn resolve_row(
    row: &SheetRow,
    index: &ReferenceIndex,
    context: &PlanImportContext,
) -> Result<ResolvedPlanRow, RowErrors> {
    let mut errors = RowErrors::new(row);
    let missing = row.missing_required();
    if !missing.is_empty() {
        for error in missing {
            errors.push_error(error);
        }
        return Err(errors);
    }

    let activity = resolve_activity(index, row, Some(context.activity_domain_ids.as_slice()), &mut errors);
    let locations = resolve_locations(index, row, &mut errors);

    let beneficiary_id = optional_ref(
        row,
        "beneficiary",
        "Beneficiary type",
        |v| index.beneficiary_type(v),
        &mut errors,
    );
    let hrp_beneficiary_id = optional_ref(
        row,
        "hrp_beneficiary",
        "Beneficiary type",
        |v| index.beneficiary_type(v),
        &mut errors,
    );
    let location_type_id = optional_ref(
        row,
        "location_type",
        "Location type",
        |v| index.location_type(v),
        &mut errors,
    );
    let facility_site_type_id = optional_ref(
        row,
        "facility_site_type",
        "Facility site type",
        |v| index.facility_site_type(v),
        &mut errors,
    );
    let implementing_partner_id = optional_ref(
        row,
        "implementing_partner_code",
        "Implementing partner",
        |v| index.organization(v),
        &mut errors,
    );

    let mut targets = Vec::new();
    for column in &context.disaggregations {
        match row.count(&column.name) {
            Ok(Some(value)) => targets.push((column.id, value)),
            Ok(None) => {}
            Err(e) => errors.push_error(e),
        }
    }

    match (activity, locations) {
        (Some(activity), Some(locations)) if errors.is_empty() => Ok(ResolvedPlanRow {
            line: row.line(),
            key: PlanKey {
                activity_domain_id: activity.activity_domain_id,
                activity_type_id: activity.activity_type.id,
                activity_detail_id: activity.activity_detail_id,
                indicator_id: activity.indicator.id,
            },
            beneficiary_id,
            hrp_beneficiary_id,
            beneficiary_category: text(row, "beneficiary_category"),
            description: text(row, "description"),
            locations,
            location_type_id,
            facility_site_type_id,
            implementing_partner_id,
            facility_name: text(row, "facility_name"),
            facility_id: text(row, "facility_id"),
            facility_lat: text(row, "facility_lat"),
            facility_long: text(row, "facility_long"),
            nhs_code: text(row, "nhs_code"),
            targets,
        }),
        _ => Err(errors),
    }
}
