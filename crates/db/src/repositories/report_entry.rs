//! Report entry repository.
//!
//! Writes activity plan reports, target location reports and their
//! disaggregation values. Every change to a location report or its values
//! recomputes `target_achieved` of the owning plan report from the stored
//! rows.

use chrono::Utc;
use std::collections::HashMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use reporthub_core::location::{LocationError, LocationPath, LocationService};
use reporthub_core::reporting::{
    BeneficiaryStatus as CoreBeneficiaryStatus, DisaggregationRef, DisaggregationValues,
    EntryInput, EntryRow, ExistingEntry, ReportError, ReportLifecycle, build_entry_template,
    validate_entries,
};
use reporthub_core::rollup::{ReachedEntry, Rollup, TargetAndReached};
use reporthub_shared::types::DisaggregationId;

use crate::entities::{
    activity_plan_reports, activity_plans, disaggregation_location_reports,
    disaggregation_locations, locations, project_monthly_reports, target_location_reports,
    target_locations,
};
use crate::repositories::location::to_node;
use crate::repositories::monthly_report::find_report;
use crate::repositories::reference::{disaggregation_names, disaggregations_by_indicator, field_schema};

/// Input for adding an activity plan report.
#[derive(Debug, Clone, Default)]
pub struct AddPlanReportInput {
    /// Planned activity being reported on.
    pub activity_plan_id: Uuid,
    /// Response types.
    pub response_types: Vec<String>,
    /// Units delivered.
    pub units: Option<i64>,
    /// Number of transfers, 0 to 30.
    pub no_of_transfers: Option<i32>,
    /// Values for the activity type's report fields.
    pub report_fields: Option<Value>,
}

/// Input for adding a target location report.
#[derive(Debug, Clone, Default)]
pub struct AddLocationReportInput {
    /// Planned location, when the report matches one.
    pub target_location_id: Option<Uuid>,
    /// Country, taken from the target location when absent.
    pub country_id: Option<Uuid>,
    /// Province, taken from the target location when absent.
    pub province_id: Option<Uuid>,
    /// District, taken from the target location when absent.
    pub district_id: Option<Uuid>,
    /// Zone.
    pub zone_id: Option<Uuid>,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// Beneficiary status, new by default.
    pub beneficiary_status: CoreBeneficiaryStatus,
    /// Values per disaggregation.
    pub values: Vec<EntryInput>,
}

fn db(e: DbErr) -> ReportError {
    ReportError::Database(e.to_string())
}

/// Report entry repository.
#[derive(Debug, Clone)]
pub struct ReportEntryRepository {
    db: DatabaseConnection,
}

impl ReportEntryRepository {
    /// Creates a new report entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Monthly report owning a plan report.
    pub async fn report_of_plan_report(
        &self,
        plan_report_id: Uuid,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let plan_report = find_plan_report(&self.db, plan_report_id).await?;
        find_report(&self.db, plan_report.monthly_report_id).await
    }

    /// Monthly report owning a location report.
    pub async fn report_of_location_report(
        &self,
        location_report_id: Uuid,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let location_report = find_location_report(&self.db, location_report_id).await?;
        self.report_of_plan_report(location_report.activity_plan_report_id)
            .await
    }

    /// Adds an activity plan report to an editable monthly report.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report is not editable
    /// - The activity plan belongs to another project
    /// - The report fields do not match the activity type's schema
    /// - Database operation fails
    pub async fn add_plan_report(
        &self,
        report_id: Uuid,
        input: AddPlanReportInput,
    ) -> Result<activity_plan_reports::Model, ReportError> {
        let report = find_report(&self.db, report_id).await?;
        ReportLifecycle::ensure_editable(report.state.into())?;

        let plan = activity_plans::Entity::find_by_id(input.activity_plan_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(ReportError::ReferenceNotFound {
                kind: "Activity plan",
                id: input.activity_plan_id,
            })?;
        if plan.project_id != report.project_id {
            return Err(ReportError::ProjectMismatch);
        }

        let schema = field_schema(&self.db, plan.activity_type_id)
            .await
            .map_err(db)?;
        let report_fields = match &input.report_fields {
            Some(values) => Some(schema.normalize(values)?),
            None if schema.fields().iter().any(|f| f.required) => {
                Some(schema.normalize(&Value::Object(serde_json::Map::new()))?)
            }
            None => None,
        };

        let now = Utc::now().into();
        let plan_report = activity_plan_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            monthly_report_id: Set(report_id),
            activity_plan_id: Set(plan.id),
            indicator_id: Set(plan.indicator_id),
            target_achieved: Set(0),
            response_types: Set(serde_json::json!(input.response_types)),
            units: Set(input.units),
            no_of_transfers: Set(input.no_of_transfers),
            report_fields: Set(report_fields),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db)?;

        tracing::info!(
            plan_report_id = %plan_report.id,
            report_id = %report_id,
            activity_plan_id = %plan.id,
            "Activity plan report added"
        );
        Ok(plan_report)
    }

    /// Adds a target location report with its values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report is not editable
    /// - The target location belongs to another activity plan
    /// - The locations do not form a country, province, district chain
    /// - A value is negative, repeated, or for a disaggregation the indicator does not use
    /// - Database operation fails
    pub async fn add_location_report(
        &self,
        plan_report_id: Uuid,
        input: AddLocationReportInput,
    ) -> Result<target_location_reports::Model, ReportError> {
        let plan_report = find_plan_report(&self.db, plan_report_id).await?;
        let report = find_report(&self.db, plan_report.monthly_report_id).await?;
        ReportLifecycle::ensure_editable(report.state.into())?;

        let planned = match input.target_location_id {
            Some(id) => {
                let location = target_locations::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(db)?
                    .ok_or(ReportError::ReferenceNotFound {
                        kind: "Target location",
                        id,
                    })?;
                if location.activity_plan_id != plan_report.activity_plan_id {
                    return Err(ReportError::ActivityPlanMismatch);
                }
                Some(location)
            }
            None => None,
        };

        self.check_values(plan_report.indicator_id, &input.values)
            .await?;

        let country_id = input
            .country_id
            .or(planned.as_ref().map(|l| l.country_id))
            .ok_or(ReportError::LocationRequired("Country"))?;
        let province_id = input
            .province_id
            .or(planned.as_ref().map(|l| l.province_id))
            .ok_or(ReportError::LocationRequired("Province"))?;
        let district_id = input
            .district_id
            .or(planned.as_ref().map(|l| l.district_id))
            .ok_or(ReportError::LocationRequired("District"))?;
        let zone_id = input.zone_id.or(planned.as_ref().and_then(|l| l.zone_id));

        validate_location_path(&self.db, country_id, province_id, district_id, zone_id).await?;

        // Unlinked entries join the plan's location at the same admin path.
        let planned = match planned {
            Some(location) => Some(location),
            None => {
                let mut query = target_locations::Entity::find()
                    .filter(
                        target_locations::Column::ActivityPlanId.eq(plan_report.activity_plan_id),
                    )
                    .filter(target_locations::Column::CountryId.eq(country_id))
                    .filter(target_locations::Column::ProvinceId.eq(province_id))
                    .filter(target_locations::Column::DistrictId.eq(district_id));
                if let Some(zone_id) = input.zone_id {
                    query = query.filter(target_locations::Column::ZoneId.eq(zone_id));
                }
                query
                    .order_by_asc(target_locations::Column::CreatedAt)
                    .one(&self.db)
                    .await
                    .map_err(db)?
            }
        };

        let txn = self.db.begin().await.map_err(db)?;

        let location_report = target_location_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            activity_plan_report_id: Set(plan_report_id),
            target_location_id: Set(planned.as_ref().map(|l| l.id)),
            country_id: Set(country_id),
            province_id: Set(province_id),
            district_id: Set(district_id),
            zone_id: Set(zone_id),
            location_type_id: Set(input
                .location_type_id
                .or(planned.as_ref().and_then(|l| l.location_type_id))),
            facility_site_type_id: Set(input
                .facility_site_type_id
                .or(planned.as_ref().and_then(|l| l.facility_site_type_id))),
            beneficiary_status: Set(input.beneficiary_status.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(db)?;

        insert_values(&txn, location_report.id, &input.values)
            .await
            .map_err(db)?;
        recompute_target_achieved(&txn, plan_report_id)
            .await
            .map_err(db)?;

        txn.commit().await.map_err(db)?;

        tracing::info!(
            location_report_id = %location_report.id,
            plan_report_id = %plan_report_id,
            values = input.values.len(),
            "Target location report added"
        );
        Ok(location_report)
    }

    /// Replaces every value of a location report.
    pub async fn replace_values(
        &self,
        location_report_id: Uuid,
        values: Vec<EntryInput>,
    ) -> Result<Vec<disaggregation_location_reports::Model>, ReportError> {
        let location_report = find_location_report(&self.db, location_report_id).await?;
        let plan_report = find_plan_report(&self.db, location_report.activity_plan_report_id).await?;
        let report = find_report(&self.db, plan_report.monthly_report_id).await?;
        ReportLifecycle::ensure_editable(report.state.into())?;

        self.check_values(plan_report.indicator_id, &values).await?;

        let txn = self.db.begin().await.map_err(db)?;

        disaggregation_location_reports::Entity::delete_many()
            .filter(
                disaggregation_location_reports::Column::TargetLocationReportId
                    .eq(location_report_id),
            )
            .exec(&txn)
            .await
            .map_err(db)?;
        let rows = insert_values(&txn, location_report_id, &values)
            .await
            .map_err(db)?;
        recompute_target_achieved(&txn, plan_report.id)
            .await
            .map_err(db)?;

        txn.commit().await.map_err(db)?;
        Ok(rows)
    }

    /// Deletes a location report and recomputes its plan report.
    pub async fn delete_location_report(&self, location_report_id: Uuid) -> Result<(), ReportError> {
        let location_report = find_location_report(&self.db, location_report_id).await?;
        let plan_report = find_plan_report(&self.db, location_report.activity_plan_report_id).await?;
        let report = find_report(&self.db, plan_report.monthly_report_id).await?;
        ReportLifecycle::ensure_editable(report.state.into())?;

        let txn = self.db.begin().await.map_err(db)?;
        target_location_reports::Entity::delete_by_id(location_report_id)
            .exec(&txn)
            .await
            .map_err(db)?;
        recompute_target_achieved(&txn, plan_report.id)
            .await
            .map_err(db)?;
        txn.commit().await.map_err(db)?;

        tracing::info!(location_report_id = %location_report_id, "Target location report deleted");
        Ok(())
    }

    /// Planned target and people reached for one location and disaggregation.
    ///
    /// Reached only counts location reports for new beneficiaries.
    pub async fn target_and_reached(
        &self,
        target_location_id: Uuid,
        disaggregation_id: Uuid,
    ) -> Result<TargetAndReached, ReportError> {
        let planned: Option<i64> = disaggregation_locations::Entity::find()
            .select_only()
            .column(disaggregation_locations::Column::Target)
            .filter(disaggregation_locations::Column::TargetLocationId.eq(target_location_id))
            .filter(disaggregation_locations::Column::DisaggregationId.eq(disaggregation_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db)?;

        let reports = target_location_reports::Entity::find()
            .filter(target_location_reports::Column::TargetLocationId.eq(target_location_id))
            .all(&self.db)
            .await
            .map_err(db)?;

        let values = disaggregation_location_reports::Entity::find()
            .filter(
                disaggregation_location_reports::Column::TargetLocationReportId
                    .is_in(reports.iter().map(|r| r.id)),
            )
            .filter(disaggregation_location_reports::Column::DisaggregationId.eq(disaggregation_id))
            .all(&self.db)
            .await
            .map_err(db)?;

        let entries: Vec<ReachedEntry> = values
            .iter()
            .filter_map(|v| {
                reports
                    .iter()
                    .find(|r| r.id == v.target_location_report_id)
                    .map(|r| ReachedEntry {
                        reached: v.reached,
                        status: r.beneficiary_status.into(),
                    })
            })
            .collect();

        Ok(Rollup::target_and_reached(planned, &entries))
    }

    /// Editable rows for a location report of a plan report.
    ///
    /// Existing values come first, then the indicator's disaggregations
    /// without a value, then `extra` blank rows.
    pub async fn entry_template(
        &self,
        plan_report_id: Uuid,
        location_report_id: Option<Uuid>,
        extra: usize,
    ) -> Result<Vec<EntryRow>, ReportError> {
        let plan_report = find_plan_report(&self.db, plan_report_id).await?;
        let configured = disaggregations_by_indicator(&self.db, &[plan_report.indicator_id])
            .await
            .map_err(db)?
            .remove(&plan_report.indicator_id)
            .unwrap_or_default();

        let mut existing = Vec::new();
        if let Some(location_report_id) = location_report_id {
            let location_report = find_location_report(&self.db, location_report_id).await?;
            if location_report.activity_plan_report_id != plan_report_id {
                return Err(ReportError::LocationReportNotFound(location_report_id));
            }

            let rows = disaggregation_location_reports::Entity::find()
                .filter(
                    disaggregation_location_reports::Column::TargetLocationReportId
                        .eq(location_report_id),
                )
                .order_by_asc(disaggregation_location_reports::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(db)?;
            let names = disaggregation_names(&self.db, rows.iter().map(|r| r.disaggregation_id))
                .await
                .map_err(db)?;

            existing = rows
                .into_iter()
                .map(|row| ExistingEntry {
                    id: row.id,
                    disaggregation: DisaggregationRef {
                        id: DisaggregationId::from_uuid(row.disaggregation_id),
                        name: names.get(&row.disaggregation_id).cloned().unwrap_or_default(),
                    },
                    values: DisaggregationValues {
                        target: row.target,
                        target_required: row.target_required,
                        reached: row.reached,
                    },
                })
                .collect();
        }

        Ok(build_entry_template(&configured, &existing, extra))
    }

    async fn check_values(&self, indicator_id: Uuid, values: &[EntryInput]) -> Result<(), ReportError> {
        let configured: Vec<DisaggregationId> =
            disaggregations_by_indicator(&self.db, &[indicator_id])
                .await
                .map_err(db)?
                .remove(&indicator_id)
                .unwrap_or_default()
                .into_iter()
                .map(|d| d.id)
                .collect();
        validate_entries(&configured, values)
    }
}

/// Checks that the reported locations form a country, province, district (, zone) chain.
async fn validate_location_path<C: ConnectionTrait>(
    conn: &C,
    country_id: Uuid,
    province_id: Uuid,
    district_id: Uuid,
    zone_id: Option<Uuid>,
) -> Result<(), ReportError> {
    let mut ids = vec![country_id, province_id, district_id];
    ids.extend(zone_id);

    let models = locations::Entity::find()
        .filter(locations::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(db)?;
    let nodes = models
        .iter()
        .map(|m| to_node(m).map(|n| (m.id, n)))
        .collect::<Result<HashMap<_, _>, _>>()?;

    let node = |id: Uuid| {
        nodes
            .get(&id)
            .ok_or_else(|| LocationError::NotFound(id.to_string()))
    };

    LocationService::validate_path(&LocationPath {
        country: node(country_id)?,
        province: node(province_id)?,
        district: node(district_id)?,
        zone: zone_id.map(node).transpose()?,
    })?;
    Ok(())
}

async fn find_plan_report<C: ConnectionTrait>(
    conn: &C,
    plan_report_id: Uuid,
) -> Result<activity_plan_reports::Model, ReportError> {
    activity_plan_reports::Entity::find_by_id(plan_report_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(ReportError::PlanReportNotFound(plan_report_id))
}

async fn find_location_report<C: ConnectionTrait>(
    conn: &C,
    location_report_id: Uuid,
) -> Result<target_location_reports::Model, ReportError> {
    target_location_reports::Entity::find_by_id(location_report_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(ReportError::LocationReportNotFound(location_report_id))
}

pub(crate) async fn insert_values<C: ConnectionTrait>(
    conn: &C,
    location_report_id: Uuid,
    values: &[EntryInput],
) -> Result<Vec<disaggregation_location_reports::Model>, DbErr> {
    let now = Utc::now().into();
    let mut rows = Vec::with_capacity(values.len());
    for value in values {
        let row = disaggregation_location_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            target_location_report_id: Set(location_report_id),
            disaggregation_id: Set(value.disaggregation_id.into_inner()),
            target: Set(value.target),
            target_required: Set(value.target_required),
            reached: Set(value.reached),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rebuilds `target_achieved` of a plan report from its stored values.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn recompute_target_achieved<C: ConnectionTrait>(
    conn: &C,
    plan_report_id: Uuid,
) -> Result<i64, DbErr> {
    let location_report_ids: Vec<Uuid> = target_location_reports::Entity::find()
        .select_only()
        .column(target_location_reports::Column::Id)
        .filter(target_location_reports::Column::ActivityPlanReportId.eq(plan_report_id))
        .into_tuple()
        .all(conn)
        .await?;

    let targets: Vec<i64> = disaggregation_location_reports::Entity::find()
        .select_only()
        .column(disaggregation_location_reports::Column::Target)
        .filter(
            disaggregation_location_reports::Column::TargetLocationReportId
                .is_in(location_report_ids),
        )
        .into_tuple()
        .all(conn)
        .await?;

    let total = Rollup::target_achieved(targets);

    activity_plan_reports::ActiveModel {
        id: Set(plan_report_id),
        target_achieved: Set(total),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .update(conn)
    .await?;

    Ok(total)
}
