//! Dashboard repository for the 5W figures and report counts.
//!
//! Loads reach records of submitted and completed reports and folds them
//! with the core dashboard aggregation.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, Func},
};
use serde::Serialize;
use uuid::Uuid;

use reporthub_core::dashboard::{FiveWSummary, ReachRecord, ReportStateCounts, summarize};
use reporthub_core::reporting::ReportState as CoreReportState;
use reporthub_shared::AppError;

use crate::entities::{
    activity_domains, activity_plan_reports, activity_plans, clusters,
    disaggregation_location_reports, organizations, project_clusters, project_monthly_reports,
    projects,
    sea_orm_active_enums::{BeneficiaryStatus, ReportState},
    target_location_reports, target_locations,
};
use crate::repositories::reference::disaggregation_names;

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Cluster not found.
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::ClusterNotFound(_) | DashboardError::OrganizationNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DashboardError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// 5W dashboard of a cluster.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterDashboard {
    /// Cluster code.
    pub cluster: String,
    /// Cluster title.
    pub title: String,
    /// Aggregated figures.
    #[serde(flatten)]
    pub summary: FiveWSummary,
}

/// 5W dashboard of an organization.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationDashboard {
    /// Organization code.
    pub organization: String,
    /// Organization name.
    pub name: String,
    /// Aggregated figures.
    #[serde(flatten)]
    pub summary: FiveWSummary,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 5W figures over the projects of a cluster.
    ///
    /// # Errors
    ///
    /// Returns `ClusterNotFound` when no cluster has the code.
    pub async fn cluster(&self, code: &str) -> Result<ClusterDashboard, DashboardError> {
        let cluster = clusters::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(clusters::Column::Code)))
                    .eq(code.trim().to_lowercase()),
            )
            .one(&self.db)
            .await?
            .ok_or_else(|| DashboardError::ClusterNotFound(code.to_string()))?;

        let project_ids: Vec<Uuid> = project_clusters::Entity::find()
            .select_only()
            .column(project_clusters::Column::ProjectId)
            .filter(project_clusters::Column::ClusterId.eq(cluster.id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let records = reach_records(&self.db, &project_ids).await?;
        tracing::debug!(cluster = %cluster.code, records = records.len(), "Cluster dashboard loaded");

        Ok(ClusterDashboard {
            cluster: cluster.code,
            title: cluster.title,
            summary: summarize(&records),
        })
    }

    /// 5W figures over the projects of an organization.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationNotFound` when no organization has the code.
    pub async fn organization(&self, code: &str) -> Result<OrganizationDashboard, DashboardError> {
        let organization = organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code.trim()))
            .one(&self.db)
            .await?
            .ok_or_else(|| DashboardError::OrganizationNotFound(code.to_string()))?;

        let project_ids: Vec<Uuid> = projects::Entity::find()
            .select_only()
            .column(projects::Column::Id)
            .filter(projects::Column::OrganizationId.eq(organization.id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let records = reach_records(&self.db, &project_ids).await?;
        tracing::debug!(organization = %organization.code, records = records.len(), "Organization dashboard loaded");

        Ok(OrganizationDashboard {
            organization: organization.code,
            name: organization.name,
            summary: summarize(&records),
        })
    }

    /// Report counts per state over the projects of the given clusters.
    ///
    /// `None` counts every report.
    pub async fn report_state_counts(
        &self,
        cluster_codes: Option<&[String]>,
    ) -> Result<ReportStateCounts, DashboardError> {
        let mut query = project_monthly_reports::Entity::find()
            .select_only()
            .column(project_monthly_reports::Column::State);

        if let Some(codes) = cluster_codes {
            let lowered: Vec<String> = codes.iter().map(|c| c.to_lowercase()).collect();
            let cluster_ids: Vec<Uuid> = clusters::Entity::find()
                .select_only()
                .column(clusters::Column::Id)
                .filter(Expr::expr(Func::lower(Expr::col(clusters::Column::Code))).is_in(lowered))
                .into_tuple()
                .all(&self.db)
                .await?;
            let project_ids: Vec<Uuid> = project_clusters::Entity::find()
                .select_only()
                .column(project_clusters::Column::ProjectId)
                .filter(project_clusters::Column::ClusterId.is_in(cluster_ids))
                .distinct()
                .into_tuple()
                .all(&self.db)
                .await?;
            query = query.filter(project_monthly_reports::Column::ProjectId.is_in(project_ids));
        }

        let states: Vec<ReportState> = query.into_tuple().all(&self.db).await?;
        Ok(ReportStateCounts::from_pairs(
            states.into_iter().map(|s| (CoreReportState::from(s), 1)),
        ))
    }
}

/// Reach records of the submitted and completed reports of some projects.
///
/// Only new beneficiaries are included. A location report without values
/// still yields one record so it counts towards indicators, partners and
/// provinces.
async fn reach_records<C: ConnectionTrait>(
    conn: &C,
    project_ids: &[Uuid],
) -> Result<Vec<ReachRecord>, DbErr> {
    if project_ids.is_empty() {
        return Ok(Vec::new());
    }

    let reports: HashMap<Uuid, project_monthly_reports::Model> =
        project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.is_in(project_ids.iter().copied()))
            .filter(
                project_monthly_reports::Column::State
                    .is_in([ReportState::Submitted, ReportState::Completed]),
            )
            .all(conn)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

    let plan_reports = activity_plan_reports::Entity::find()
        .filter(activity_plan_reports::Column::MonthlyReportId.is_in(reports.keys().copied()))
        .all(conn)
        .await?;

    let plans: HashMap<Uuid, activity_plans::Model> = activity_plans::Entity::find()
        .filter(activity_plans::Column::ProjectId.is_in(project_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let domains: HashMap<Uuid, String> = activity_domains::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();
    let partners: HashMap<Uuid, Option<Uuid>> = target_locations::Entity::find()
        .filter(target_locations::Column::ProjectId.is_in(project_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|l| (l.id, l.implementing_partner_id))
        .collect();

    let location_reports = target_location_reports::Entity::find()
        .filter(
            target_location_reports::Column::ActivityPlanReportId
                .is_in(plan_reports.iter().map(|p| p.id)),
        )
        .filter(
            target_location_reports::Column::BeneficiaryStatus
                .eq(BeneficiaryStatus::NewBeneficiary),
        )
        .all(conn)
        .await?;

    let mut values: HashMap<Uuid, Vec<disaggregation_location_reports::Model>> = HashMap::new();
    for value in disaggregation_location_reports::Entity::find()
        .filter(
            disaggregation_location_reports::Column::TargetLocationReportId
                .is_in(location_reports.iter().map(|l| l.id)),
        )
        .all(conn)
        .await?
    {
        values.entry(value.target_location_report_id).or_default().push(value);
    }
    let names =
        disaggregation_names(conn, values.values().flatten().map(|v| v.disaggregation_id)).await?;

    let plan_reports: HashMap<Uuid, activity_plan_reports::Model> =
        plan_reports.into_iter().map(|p| (p.id, p)).collect();

    let mut records = Vec::new();
    for location_report in location_reports {
        let Some(plan_report) = plan_reports.get(&location_report.activity_plan_report_id) else {
            continue;
        };
        let Some(report_month) = reports
            .get(&plan_report.monthly_report_id)
            .and_then(|r| r.from_date)
        else {
            continue;
        };
        let activity_domain = plans
            .get(&plan_report.activity_plan_id)
            .and_then(|p| domains.get(&p.activity_domain_id))
            .cloned()
            .unwrap_or_default();
        let implementing_partner_id = location_report
            .target_location_id
            .and_then(|id| partners.get(&id).copied().flatten());

        let record = ReachRecord {
            report_month,
            indicator_id: plan_report.indicator_id,
            implementing_partner_id,
            province_id: Some(location_report.province_id),
            activity_domain,
            disaggregation_name: None,
            reached: 0,
        };

        match values.remove(&location_report.id) {
            Some(rows) if !rows.is_empty() => {
                for row in rows {
                    records.push(ReachRecord {
                        disaggregation_name: names.get(&row.disaggregation_id).cloned(),
                        reached: row.reached,
                        ..record.clone()
                    });
                }
            }
            _ => records.push(record),
        }
    }

    Ok(records)
}
