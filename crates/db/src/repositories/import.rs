//! CSV import persistence.
//!
//! Rows are resolved read-only against the reference index and the
//! project's planned tree, then applied in one transaction.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use reporthub_core::import::{
    ActivityPlanRef, DisaggregationColumn, ImportError, ImportSummary, PlanImportContext, PlanKey,
    ReportImportContext, ResolvedReportRow, TargetLocationRef, group_by_plan, read_sheet,
    resolve_plan_rows, resolve_report_rows,
};
use reporthub_core::planning::ProjectLifecycle;
use reporthub_core::reporting::ReportLifecycle;
use reporthub_shared::types::{ActivityPlanId, DisaggregationId, LocationId, TargetLocationId};

use crate::entities::{
    activity_plan_reports, activity_plans, disaggregation_clusters, disaggregation_locations,
    disaggregation_location_reports, project_activity_domains, project_clusters,
    target_location_reports, target_locations,
};
use crate::repositories::monthly_report::find_report;
use crate::repositories::project::find_project;
use crate::repositories::reference::{disaggregation_names, load_index};
use crate::repositories::report_entry::recompute_target_achieved;

fn db(e: DbErr) -> ImportError {
    ImportError::Database(e.to_string())
}

/// Import repository.
#[derive(Debug, Clone)]
pub struct ImportRepository {
    db: DatabaseConnection,
    max_rows: usize,
}

impl ImportRepository {
    /// Creates a new import repository accepting at most `max_rows` data rows per file.
    #[must_use]
    pub const fn new(db: DatabaseConnection, max_rows: usize) -> Self {
        Self { db, max_rows }
    }

    /// Imports a monthly report CSV.
    ///
    /// Rows that fail resolution are skipped and listed in the summary.
    /// The remaining rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report is not found or not editable
    /// - The file is not valid CSV, lacks required columns or has no rows
    /// - Database operation fails
    pub async fn import_report<R: Read>(
        &self,
        report_id: Uuid,
        file: R,
    ) -> Result<ImportSummary, ImportError> {
        let report = find_report(&self.db, report_id).await?;
        ReportLifecycle::ensure_editable(report.state.into())?;

        let sheet = read_sheet(file, self.max_rows)?;
        let index = load_index(&self.db).await.map_err(db)?;
        let context = report_context(&self.db, report.project_id)
            .await
            .map_err(db)?;
        let outcome = resolve_report_rows(&sheet, &index, &context);

        let txn = self.db.begin().await.map_err(db)?;

        let mut plan_reports: HashMap<Uuid, Uuid> = activity_plan_reports::Entity::find()
            .filter(activity_plan_reports::Column::MonthlyReportId.eq(report_id))
            .all(&txn)
            .await
            .map_err(db)?
            .into_iter()
            .map(|p| (p.activity_plan_id, p.id))
            .collect();
        let mut touched: HashSet<Uuid> = HashSet::new();

        for row in &outcome.rows {
            let activity_plan_id = row.activity_plan_id.into_inner();
            let plan_report_id = match plan_reports.get(&activity_plan_id) {
                Some(id) => *id,
                None => {
                    let id = insert_plan_report(&txn, report_id, row).await.map_err(db)?;
                    plan_reports.insert(activity_plan_id, id);
                    id
                }
            };
            insert_location_report(&txn, plan_report_id, row)
                .await
                .map_err(db)?;
            touched.insert(plan_report_id);
        }

        for plan_report_id in &touched {
            recompute_target_achieved(&txn, *plan_report_id)
                .await
                .map_err(db)?;
        }

        txn.commit().await.map_err(db)?;

        let summary = outcome.summary(outcome.rows.len());
        tracing::info!(
            report_id = %report_id,
            imported_rows = summary.imported_rows,
            skipped_rows = summary.skipped_rows,
            "Monthly report import finished"
        );
        Ok(summary)
    }

    /// Imports activity plans, target locations and targets into a project.
    ///
    /// Nothing is written unless every row resolves. Rows matching an
    /// existing activity plan add target locations to it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project is not found or not editable
    /// - The file is not valid CSV, lacks required columns or has no rows
    /// - Database operation fails
    pub async fn import_plans<R: Read>(
        &self,
        project_id: Uuid,
        file: R,
    ) -> Result<ImportSummary, ImportError> {
        let project = find_project(&self.db, project_id).await?;
        ProjectLifecycle::ensure_editable(project.state.into())?;

        let sheet = read_sheet(file, self.max_rows)?;
        let index = load_index(&self.db).await.map_err(db)?;
        let context = plan_context(&self.db, project_id).await.map_err(db)?;
        let outcome = resolve_plan_rows(&sheet, &index, &context);

        if !outcome.errors.is_empty() {
            tracing::info!(
                project_id = %project_id,
                errors = outcome.errors.len(),
                "Activity plan import rejected"
            );
            return Ok(outcome.summary(0));
        }

        let existing: HashMap<PlanKey, Uuid> = plan_refs(&self.db, project_id)
            .await
            .map_err(db)?
            .into_iter()
            .map(|p| (p.key, p.id.into_inner()))
            .collect();

        let imported_rows = outcome.rows.len();
        let summary = outcome.summary(imported_rows);
        let planned = group_by_plan(outcome.rows);

        let txn = self.db.begin().await.map_err(db)?;
        let now = Utc::now().into();

        for activity in planned {
            let activity_plan_id = match existing.get(&activity.key) {
                Some(id) => *id,
                None => {
                    activity_plans::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        project_id: Set(project_id),
                        activity_domain_id: Set(activity.key.activity_domain_id),
                        activity_type_id: Set(activity.key.activity_type_id),
                        activity_detail_id: Set(activity.key.activity_detail_id),
                        indicator_id: Set(activity.key.indicator_id),
                        beneficiary_id: Set(activity.beneficiary_id),
                        hrp_beneficiary_id: Set(activity.hrp_beneficiary_id),
                        beneficiary_category: Set(activity.beneficiary_category.clone()),
                        description: Set(activity.description.clone()),
                        state: Set(project.state),
                        is_active: Set(true),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(db)?
                    .id
                }
            };

            for row in activity.rows {
                let location = target_locations::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    project_id: Set(project_id),
                    activity_plan_id: Set(activity_plan_id),
                    country_id: Set(row.locations.country_id.into_inner()),
                    province_id: Set(row.locations.province_id.into_inner()),
                    district_id: Set(row.locations.district_id.into_inner()),
                    zone_id: Set(row.locations.zone_id.map(LocationId::into_inner)),
                    location_type_id: Set(row.location_type_id),
                    implementing_partner_id: Set(row.implementing_partner_id),
                    facility_site_type_id: Set(row.facility_site_type_id),
                    facility_monitoring: Set(row.facility_name.is_some()),
                    facility_name: Set(row.facility_name),
                    facility_id: Set(row.facility_id),
                    facility_lat: Set(row.facility_lat),
                    facility_long: Set(row.facility_long),
                    nhs_code: Set(row.nhs_code),
                    state: Set(project.state),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(db)?;

                for (disaggregation_id, target) in row.targets {
                    disaggregation_locations::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        target_location_id: Set(location.id),
                        disaggregation_id: Set(disaggregation_id.into_inner()),
                        target: Set(target),
                        created_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(db)?;
                }
            }
        }

        txn.commit().await.map_err(db)?;

        tracing::info!(
            project_id = %project_id,
            imported_rows,
            "Activity plan import finished"
        );
        Ok(summary)
    }
}

async fn insert_plan_report<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
    row: &ResolvedReportRow,
) -> Result<Uuid, DbErr> {
    let now = Utc::now().into();
    let plan_report = activity_plan_reports::ActiveModel {
        id: Set(Uuid::now_v7()),
        monthly_report_id: Set(report_id),
        activity_plan_id: Set(row.activity_plan_id.into_inner()),
        indicator_id: Set(row.indicator_id.into_inner()),
        target_achieved: Set(0),
        response_types: Set(serde_json::json!([])),
        units: Set(None),
        no_of_transfers: Set(None),
        report_fields: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(plan_report.id)
}

async fn insert_location_report<C: ConnectionTrait>(
    conn: &C,
    plan_report_id: Uuid,
    row: &ResolvedReportRow,
) -> Result<(), DbErr> {
    let now = Utc::now().into();
    let location_report = target_location_reports::ActiveModel {
        id: Set(Uuid::now_v7()),
        activity_plan_report_id: Set(plan_report_id),
        target_location_id: Set(row.target_location_id.map(TargetLocationId::into_inner)),
        country_id: Set(row.country_id.into_inner()),
        province_id: Set(row.province_id.into_inner()),
        district_id: Set(row.district_id.into_inner()),
        zone_id: Set(row.zone_id.map(LocationId::into_inner)),
        location_type_id: Set(row.location_type_id),
        facility_site_type_id: Set(row.facility_site_type_id),
        beneficiary_status: Set(row.beneficiary_status.into()),
        created_at: Set(now),
    }
    .insert(conn)
    .await?;

    for (disaggregation_id, value) in &row.values {
        disaggregation_location_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            target_location_report_id: Set(location_report.id),
            disaggregation_id: Set(disaggregation_id.into_inner()),
            target: Set(*value),
            target_required: Set(0),
            reached: Set(*value),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Activity plans of a project keyed by what they plan.
async fn plan_refs<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<Vec<ActivityPlanRef>, DbErr> {
    Ok(activity_plans::Entity::find()
        .filter(activity_plans::Column::ProjectId.eq(project_id))
        .order_by_asc(activity_plans::Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(|p| ActivityPlanRef {
            id: ActivityPlanId::from_uuid(p.id),
            key: PlanKey {
                activity_domain_id: p.activity_domain_id,
                activity_type_id: p.activity_type_id,
                activity_detail_id: p.activity_detail_id,
                indicator_id: p.indicator_id,
            },
        })
        .collect())
}

/// Planned tree of a project as seen by the report import and its template.
pub(crate) async fn report_context<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<ReportImportContext, DbErr> {
    let activity_plans = plan_refs(conn, project_id).await?;

    let locations = target_locations::Entity::find()
        .filter(target_locations::Column::ProjectId.eq(project_id))
        .order_by_asc(target_locations::Column::CreatedAt)
        .all(conn)
        .await?;

    let planned: Vec<Uuid> = disaggregation_locations::Entity::find()
        .select_only()
        .column(disaggregation_locations::Column::DisaggregationId)
        .filter(
            disaggregation_locations::Column::TargetLocationId
                .is_in(locations.iter().map(|l| l.id)),
        )
        .distinct()
        .into_tuple()
        .all(conn)
        .await?;

    let target_locations = locations
        .into_iter()
        .map(|l| TargetLocationRef {
            id: TargetLocationId::from_uuid(l.id),
            activity_plan_id: ActivityPlanId::from_uuid(l.activity_plan_id),
            country_id: LocationId::from_uuid(l.country_id),
            province_id: LocationId::from_uuid(l.province_id),
            district_id: LocationId::from_uuid(l.district_id),
            zone_id: l.zone_id.map(LocationId::from_uuid),
        })
        .collect();

    Ok(ReportImportContext {
        activity_plans,
        target_locations,
        disaggregations: columns(disaggregation_names(conn, planned).await?),
    })
}

async fn plan_context<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<PlanImportContext, DbErr> {
    let activity_domain_ids: Vec<Uuid> = project_activity_domains::Entity::find()
        .select_only()
        .column(project_activity_domains::Column::ActivityDomainId)
        .filter(project_activity_domains::Column::ProjectId.eq(project_id))
        .into_tuple()
        .all(conn)
        .await?;

    let cluster_ids: Vec<Uuid> = project_clusters::Entity::find()
        .select_only()
        .column(project_clusters::Column::ClusterId)
        .filter(project_clusters::Column::ProjectId.eq(project_id))
        .into_tuple()
        .all(conn)
        .await?;

    let disaggregation_ids: Vec<Uuid> = disaggregation_clusters::Entity::find()
        .select_only()
        .column(disaggregation_clusters::Column::DisaggregationId)
        .filter(disaggregation_clusters::Column::ClusterId.is_in(cluster_ids))
        .distinct()
        .into_tuple()
        .all(conn)
        .await?;

    Ok(PlanImportContext {
        activity_domain_ids,
        disaggregations: columns(disaggregation_names(conn, disaggregation_ids).await?),
    })
}

/// Disaggregation columns ordered by name, then id. Every disaggregation keeps its column.
fn columns(names: HashMap<Uuid, String>) -> Vec<DisaggregationColumn> {
    let mut columns: Vec<DisaggregationColumn> = names
        .into_iter()
        .map(|(id, name)| DisaggregationColumn {
            id: DisaggregationId::from_uuid(id),
            name,
        })
        .collect();
    columns.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    columns
}
