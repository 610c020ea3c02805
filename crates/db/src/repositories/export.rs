//! CSV export of monthly reports and the report import template.

use std::collections::{BTreeMap, HashMap};

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use reporthub_core::export::{
    ExportError, ReportExportRow, TemplateExample, write_import_template, write_report_csv,
};
use reporthub_core::planning::ProjectState as CoreProjectState;
use reporthub_core::reporting::{
    BeneficiaryStatus as CoreBeneficiaryStatus, ReportState as CoreReportState,
};

use crate::entities::{
    activity_details, activity_domains, activity_plan_reports, activity_plans, activity_types,
    clusters, disaggregation_location_reports, facility_site_types, indicators, location_types,
    locations, organizations, project_clusters, project_implementing_partners,
    project_monthly_reports, projects, target_location_reports, target_locations,
};
use crate::repositories::import::report_context;
use crate::repositories::reference::disaggregation_names;

fn db(e: DbErr) -> ExportError {
    ExportError::Database(e.to_string())
}

/// Name lookups shared by every export row.
struct Names {
    locations: HashMap<Uuid, locations::Model>,
    domains: HashMap<Uuid, activity_domains::Model>,
    types: HashMap<Uuid, activity_types::Model>,
    details: HashMap<Uuid, activity_details::Model>,
    indicators: HashMap<Uuid, String>,
    location_types: HashMap<Uuid, String>,
    facility_site_types: HashMap<Uuid, String>,
}

impl Names {
    fn location_code(&self, id: Uuid) -> String {
        self.locations.get(&id).map(|l| l.code.clone()).unwrap_or_default()
    }

    fn location_name(&self, id: Uuid) -> String {
        self.locations.get(&id).map(|l| l.name.clone()).unwrap_or_default()
    }
}

/// Export repository.
#[derive(Debug, Clone)]
pub struct ExportRepository {
    db: DatabaseConnection,
}

impl ExportRepository {
    /// Creates a new export repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// CSV export of one monthly report.
    pub async fn report_csv(&self, report_id: Uuid) -> Result<Vec<u8>, ExportError> {
        let report = project_monthly_reports::Entity::find_by_id(report_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(ExportError::ReportNotFound(report_id))?;
        self.write(vec![report]).await
    }

    /// CSV export of every report of a project, oldest period first.
    pub async fn project_csv(&self, project_id: Uuid) -> Result<Vec<u8>, ExportError> {
        let reports = project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.eq(project_id))
            .order_by_asc(project_monthly_reports::Column::FromDate)
            .all(&self.db)
            .await
            .map_err(db)?;
        self.write(reports).await
    }

    /// Import template for a monthly report: the header row and one example
    /// row per planned target location of its project.
    pub async fn import_template_csv(&self, report_id: Uuid) -> Result<Vec<u8>, ExportError> {
        let report = project_monthly_reports::Entity::find_by_id(report_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(ExportError::ReportNotFound(report_id))?;

        let context = report_context(&self.db, report.project_id)
            .await
            .map_err(db)?;
        let disaggregations: Vec<String> =
            context.disaggregations.iter().map(|d| d.name.clone()).collect();

        let plans: HashMap<Uuid, activity_plans::Model> = activity_plans::Entity::find()
            .filter(activity_plans::Column::ProjectId.eq(report.project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let planned = target_locations::Entity::find()
            .filter(target_locations::Column::ProjectId.eq(report.project_id))
            .order_by_asc(target_locations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;

        let names = self.names(&planned_location_ids(&planned)).await?;

        let examples: Vec<TemplateExample> = planned
            .iter()
            .filter_map(|location| {
                let plan = plans.get(&location.activity_plan_id)?;
                Some(TemplateExample {
                    indicator: names.indicators.get(&plan.indicator_id).cloned().unwrap_or_default(),
                    activity_domain: names
                        .domains
                        .get(&plan.activity_domain_id)
                        .map(|d| d.code.clone())
                        .unwrap_or_default(),
                    activity_type: names
                        .types
                        .get(&plan.activity_type_id)
                        .map(|t| t.code.clone())
                        .unwrap_or_default(),
                    activity_detail: plan
                        .activity_detail_id
                        .and_then(|id| names.details.get(&id))
                        .map(|d| d.code.clone()),
                    admin0pcode: names.location_code(location.country_id),
                    admin1pcode: names.location_code(location.province_id),
                    admin2pcode: names.location_code(location.district_id),
                    zone: location.zone_id.map(|id| names.location_code(id)),
                    location_type: location
                        .location_type_id
                        .and_then(|id| names.location_types.get(&id).cloned()),
                    facility_site_type: location
                        .facility_site_type_id
                        .and_then(|id| names.facility_site_types.get(&id).cloned()),
                })
            })
            .collect();

        template_bytes(&disaggregations, &examples)
    }

    async fn write(&self, reports: Vec<project_monthly_reports::Model>) -> Result<Vec<u8>, ExportError> {
        let rows = self.rows(reports).await?;
        let mut out = Vec::new();
        write_report_csv(&mut out, &rows)?;
        tracing::debug!(rows = rows.len(), bytes = out.len(), "Report export written");
        Ok(out)
    }

    /// One export row per target location report of the given reports.
    async fn rows(
        &self,
        reports: Vec<project_monthly_reports::Model>,
    ) -> Result<Vec<ReportExportRow>, ExportError> {
        let Some(project_id) = reports.first().map(|r| r.project_id) else {
            return Ok(Vec::new());
        };

        let Some(project) = projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(db)?
        else {
            return Ok(Vec::new());
        };
        let organization = organizations::Entity::find_by_id(project.organization_id)
            .one(&self.db)
            .await
            .map_err(db)?;

        let cluster_ids: Vec<Uuid> = project_clusters::Entity::find()
            .filter(project_clusters::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.cluster_id)
            .collect();
        let mut cluster_codes: Vec<String> = clusters::Entity::find()
            .filter(clusters::Column::Id.is_in(cluster_ids))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|c| c.code)
            .collect();
        cluster_codes.sort();

        let partner_ids: Vec<Uuid> = project_implementing_partners::Entity::find()
            .filter(project_implementing_partners::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.organization_id)
            .collect();
        let mut partner_codes: Vec<String> = organizations::Entity::find()
            .filter(organizations::Column::Id.is_in(partner_ids))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|o| o.code)
            .collect();
        partner_codes.sort();

        let plan_reports = activity_plan_reports::Entity::find()
            .filter(
                activity_plan_reports::Column::MonthlyReportId.is_in(reports.iter().map(|r| r.id)),
            )
            .order_by_asc(activity_plan_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;
        let plans: HashMap<Uuid, activity_plans::Model> = activity_plans::Entity::find()
            .filter(activity_plans::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let location_reports = target_location_reports::Entity::find()
            .filter(
                target_location_reports::Column::ActivityPlanReportId
                    .is_in(plan_reports.iter().map(|p| p.id)),
            )
            .order_by_asc(target_location_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;
        let planned: HashMap<Uuid, target_locations::Model> = target_locations::Entity::find()
            .filter(target_locations::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let values = disaggregation_location_reports::Entity::find()
            .filter(
                disaggregation_location_reports::Column::TargetLocationReportId
                    .is_in(location_reports.iter().map(|l| l.id)),
            )
            .all(&self.db)
            .await
            .map_err(db)?;
        let disaggregations =
            disaggregation_names(&self.db, values.iter().map(|v| v.disaggregation_id))
                .await
                .map_err(db)?;
        let mut reached: HashMap<Uuid, BTreeMap<String, i64>> = HashMap::new();
        for value in values {
            let name = disaggregations
                .get(&value.disaggregation_id)
                .cloned()
                .unwrap_or_default();
            *reached
                .entry(value.target_location_report_id)
                .or_default()
                .entry(name)
                .or_default() += value.reached;
        }

        let mut location_ids: Vec<Uuid> = Vec::new();
        for l in &location_reports {
            location_ids.extend([l.country_id, l.province_id, l.district_id]);
            location_ids.extend(l.zone_id);
        }
        let names = self.names(&location_ids).await?;

        let reports: HashMap<Uuid, project_monthly_reports::Model> =
            reports.into_iter().map(|r| (r.id, r)).collect();
        let plan_reports: HashMap<Uuid, activity_plan_reports::Model> =
            plan_reports.into_iter().map(|p| (p.id, p)).collect();

        let clusters = cluster_codes.join(", ");
        let partners = partner_codes.join(", ");
        let project_status = CoreProjectState::from(project.state).to_string();

        let mut rows = Vec::with_capacity(location_reports.len());
        for location_report in location_reports {
            let Some(plan_report) = plan_reports.get(&location_report.activity_plan_report_id) else {
                continue;
            };
            let Some(report) = reports.get(&plan_report.monthly_report_id) else {
                continue;
            };
            let plan = plans.get(&plan_report.activity_plan_id);
            let target = location_report
                .target_location_id
                .and_then(|id| planned.get(&id));
            let domain = plan.and_then(|p| names.domains.get(&p.activity_domain_id));
            let activity_type = plan.and_then(|p| names.types.get(&p.activity_type_id));
            let detail = plan
                .and_then(|p| p.activity_detail_id)
                .and_then(|id| names.details.get(&id));

            rows.push(ReportExportRow {
                project_code: project.code.clone(),
                project_title: project.title.clone(),
                project_hrp_code: project.hrp_code.clone(),
                project_start_date: Some(project.start_date),
                project_end_date: Some(project.end_date),
                project_status: project_status.clone(),
                clusters: clusters.clone(),
                organization: organization
                    .as_ref()
                    .map(|o| o.code.clone())
                    .unwrap_or_default(),
                organization_type: organization.as_ref().and_then(|o| o.org_type.clone()),
                implementing_partners: partners.clone(),
                report_status: CoreReportState::from(report.state).to_string(),
                report_from: report.from_date,
                report_to: report.to_date,
                admin0pcode: names.location_code(location_report.country_id),
                admin0name: names.location_name(location_report.country_id),
                admin1pcode: names.location_code(location_report.province_id),
                admin1name: names.location_name(location_report.province_id),
                admin2pcode: names.location_code(location_report.district_id),
                admin2name: names.location_name(location_report.district_id),
                zone: location_report.zone_id.map(|id| names.location_name(id)),
                location_type: location_report
                    .location_type_id
                    .and_then(|id| names.location_types.get(&id).cloned()),
                facility_site_type: location_report
                    .facility_site_type_id
                    .and_then(|id| names.facility_site_types.get(&id).cloned()),
                facility_name: target.and_then(|t| t.facility_name.clone()),
                facility_id: target.and_then(|t| t.facility_id.clone()),
                beneficiary_status: CoreBeneficiaryStatus::from(location_report.beneficiary_status)
                    .as_str()
                    .to_string(),
                activity_domain_code: domain.map(|d| d.code.clone()).unwrap_or_default(),
                activity_domain_name: domain.map(|d| d.name.clone()).unwrap_or_default(),
                activity_type_code: activity_type.map(|t| t.code.clone()).unwrap_or_default(),
                activity_type_name: activity_type.map(|t| t.name.clone()).unwrap_or_default(),
                activity_detail_code: detail.map(|d| d.code.clone()),
                activity_detail_name: detail.map(|d| d.name.clone()),
                indicator: names
                    .indicators
                    .get(&plan_report.indicator_id)
                    .cloned()
                    .unwrap_or_default(),
                units: plan_report.units,
                no_of_transfers: plan_report.no_of_transfers,
                target_achieved: plan_report.target_achieved,
                reached: reached.remove(&location_report.id).unwrap_or_default(),
            });
        }

        Ok(rows)
    }

    /// Loads the taxonomy names and the given locations.
    async fn names(&self, location_ids: &[Uuid]) -> Result<Names, ExportError> {
        Ok(Names {
            locations: locations::Entity::find()
                .filter(locations::Column::Id.is_in(location_ids.iter().copied()))
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|l| (l.id, l))
                .collect(),
            domains: activity_domains::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|d| (d.id, d))
                .collect(),
            types: activity_types::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|t| (t.id, t))
                .collect(),
            details: activity_details::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|d| (d.id, d))
                .collect(),
            indicators: indicators::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|i| (i.id, i.name))
                .collect(),
            location_types: location_types::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect(),
            facility_site_types: facility_site_types::Entity::find()
                .all(&self.db)
                .await
                .map_err(db)?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect(),
        })
    }
}

fn planned_location_ids(planned: &[target_locations::Model]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(planned.len() * 3);
    for l in planned {
        ids.extend([l.country_id, l.province_id, l.district_id]);
        ids.extend(l.zone_id);
    }
    ids
}

fn template_bytes(
    disaggregations: &[String],
    examples: &[TemplateExample],
) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    write_import_template(&mut out, disaggregations, examples)?;
    Ok(out)
}
