//! Monthly report import rows.

use uuid::Uuid;

use reporthub_shared::types::{
    ActivityPlanId, DisaggregationId, IndicatorId, LocationId, TargetLocationId,
};

use crate::import::reference::{
    ActivityPlanRef, DisaggregationColumn, PlanKey, ReferenceIndex, TargetLocationRef,
};
use crate::import::rows::{RowErrors, optional_ref, resolve_activity, resolve_locations};
use crate::import::sheet::{ImportOutcome, Sheet, SheetRow};
use crate::reporting::BeneficiaryStatus;

/// The project data a report import is checked against.
#[derive(Debug, Clone, Default)]
pub struct ReportImportContext {
    /// Activity plans of the project.
    pub activity_plans: Vec<ActivityPlanRef>,
    /// Target locations of the project.
    pub target_locations: Vec<TargetLocationRef>,
    /// Disaggregations planned anywhere in the project.
    pub disaggregations: Vec<DisaggregationColumn>,
}

impl ReportImportContext {
    /// Finds the plan a row reports on.
    ///
    /// A row without an activity detail matches plans with or without one,
    /// preferring the plan without.
    fn find_plan(&self, key: &PlanKey) -> Option<&ActivityPlanRef> {
        let same_activity = |p: &&ActivityPlanRef| {
            p.key.activity_domain_id == key.activity_domain_id
                && p.key.activity_type_id == key.activity_type_id
                && p.key.indicator_id == key.indicator_id
        };
        match key.activity_detail_id {
            Some(detail) => self
                .activity_plans
                .iter()
                .filter(same_activity)
                .find(|p| p.key.activity_detail_id == Some(detail)),
            None => self
                .activity_plans
                .iter()
                .filter(same_activity)
                .min_by_key(|p| p.key.activity_detail_id.is_some()),
        }
    }

    fn find_target_location(
        &self,
        activity_plan_id: ActivityPlanId,
        country_id: LocationId,
        province_id: LocationId,
        district_id: LocationId,
        zone_id: Option<LocationId>,
    ) -> Option<TargetLocationId> {
        self.target_locations
            .iter()
            .find(|t| {
                t.activity_plan_id == activity_plan_id
                    && t.country_id == country_id
                    && t.province_id == province_id
                    && t.district_id == district_id
                    && (zone_id.is_none() || t.zone_id == zone_id)
            })
            .map(|t| t.id)
    }
}

/// A report row ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReportRow {
    /// Spreadsheet line.
    pub line: usize,
    /// Activity plan reported on.
    pub activity_plan_id: ActivityPlanId,
    /// Indicator reported on.
    pub indicator_id: IndicatorId,
    /// Planned location, when the row matches one.
    pub target_location_id: Option<TargetLocationId>,
    /// Country.
    pub country_id: LocationId,
    /// Province.
    pub province_id: LocationId,
    /// District.
    pub district_id: LocationId,
    /// Zone.
    pub zone_id: Option<LocationId>,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// New or existing beneficiaries.
    pub beneficiary_status: BeneficiaryStatus,
    /// Reached people per disaggregation.
    pub values: Vec<(DisaggregationId, i64)>,
}

/// Resolves every row of a monthly report upload.
///
/// Rows with any problem are left out and their errors collected.
#[must_use]
pub fn resolve_report_rows(
    sheet: &Sheet,
    index: &ReferenceIndex,
    context: &ReportImportContext,
) -> ImportOutcome<ResolvedReportRow> {
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

fn resolve_row(
    row: &SheetRow,
    index: &ReferenceIndex,
    context: &ReportImportContext,
) -> Result<ResolvedReportRow, RowErrors> {
    let mut errors = RowErrors::new(row);
    let missing = row.missing_required();
    if !missing.is_empty() {
        for error in missing {
            errors.push_error(error);
        }
        return Err(errors);
    }

    let activity = resolve_activity(index, row, None, &mut errors);
    let locations = resolve_locations(index, row, &mut errors);
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

    let beneficiary_status = match row.get("beneficiary_status") {
        None => BeneficiaryStatus::NewBeneficiary,
        Some(raw) => BeneficiaryStatus::parse(raw).unwrap_or_else(|| {
            errors.unknown("Beneficiary status", raw);
            BeneficiaryStatus::NewBeneficiary
        }),
    };

    let mut values = Vec::new();
    for column in &context.disaggregations {
        match row.count(&column.name) {
            Ok(Some(value)) => values.push((column.id, value)),
            Ok(None) => {}
            Err(e) => errors.push_error(e),
        }
    }

    let (Some(activity), Some(locations)) = (activity, locations) else {
        return Err(errors);
    };

    let key = PlanKey {
        activity_domain_id: activity.activity_domain_id,
        activity_type_id: activity.activity_type.id,
        activity_detail_id: activity.activity_detail_id,
        indicator_id: activity.indicator.id,
    };
    let Some(plan) = context.find_plan(&key) else {
        errors.push(format!(
            "Row {}: No activity plan of this project matches activity type '{}' and indicator '{}'.",
            errors.line(),
            activity.activity_type.name,
            activity.indicator.name
        ));
        return Err(errors);
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ResolvedReportRow {
        line: row.line(),
        activity_plan_id: plan.id,
        indicator_id: IndicatorId::from_uuid(activity.indicator.id),
        target_location_id: context.find_target_location(
            plan.id,
            locations.country_id,
            locations.province_id,
            locations.district_id,
            locations.zone_id,
        ),
        country_id: locations.country_id,
        province_id: locations.province_id,
        district_id: locations.district_id,
        zone_id: locations.zone_id,
        location_type_id,
        facility_site_type_id,
        beneficiary_status,
        values,
    })
}
