//! Report entry routes: plan reports, location reports and their values.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
    routes::{editable_project, editable_report},
};
use reporthub_core::reporting::{BeneficiaryStatus, EntryInput};
use reporthub_db::{
    ProjectRepository, ReportEntryRepository,
    repositories::{AddLocationReportInput, AddPlanReportInput},
};

/// Blank rows an entry template may append.
const MAX_EXTRA_ROWS: usize = 20;

/// Creates the report entry routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-reports/{id}/plan-reports", post(add_plan_report))
        .route(
            "/plan-reports/{id}/location-reports",
            post(add_location_report),
        )
        .route("/plan-reports/{id}/entry-template", get(entry_template))
        .route(
            "/location-reports/{id}/disaggregations",
            put(replace_values),
        )
        .route("/location-reports/{id}", delete(delete_location_report))
        .route(
            "/target-locations/{id}/disaggregations/{disaggregation_id}/progress",
            get(target_progress),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for adding a plan report.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPlanReportRequest {
    /// Planned activity being reported on.
    pub activity_plan_id: Uuid,
    /// Response types.
    #[serde(default)]
    pub response_types: Vec<String>,
    /// Units delivered.
    #[validate(range(min = 0, message = "must not be negative"))]
    pub units: Option<i64>,
    /// Number of transfers.
    #[validate(range(min = 0, max = 30, message = "must be between 0 and 30"))]
    pub no_of_transfers: Option<i32>,
    /// Values for the activity type's report fields.
    pub report_fields: Option<Value>,
}

/// Request body for adding a location report.
#[derive(Debug, Deserialize)]
pub struct AddLocationReportRequest {
    /// Planned location the report matches.
    pub target_location_id: Option<Uuid>,
    /// Country.
    pub country_id: Option<Uuid>,
    /// Province.
    pub province_id: Option<Uuid>,
    /// District.
    pub district_id: Option<Uuid>,
    /// Zone.
    pub zone_id: Option<Uuid>,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// New or existing beneficiaries.
    #[serde(default)]
    pub beneficiary_status: BeneficiaryStatus,
    /// Values per disaggregation.
    #[serde(default)]
    pub disaggregations: Vec<EntryInput>,
}

/// Request body replacing the values of a location report.
#[derive(Debug, Deserialize)]
pub struct ReplaceValuesRequest {
    /// New values per disaggregation.
    pub disaggregations: Vec<EntryInput>,
}

/// Query parameters for the entry template.
#[derive(Debug, Deserialize)]
pub struct EntryTemplateQuery {
    /// Location report whose values prefill the template.
    pub location_report_id: Option<Uuid>,
    /// Blank rows to append.
    #[serde(default)]
    pub extra: usize,
}

// ============================================================================
// Handlers
// ============================================================================

async fn add_plan_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
    Json(payload): Json<AddPlanReportRequest>,
) -> Result<impl IntoResponse, Response> {
    payload.validate().map_err(|e| validation_response(&e))?;
    editable_report(&state, auth.actor(), report_id).await?;

    let plan_report = ReportEntryRepository::new((*state.db).clone())
        .add_plan_report(
            report_id,
            AddPlanReportInput {
                activity_plan_id: payload.activity_plan_id,
                response_types: payload.response_types,
                units: payload.units,
                no_of_transfers: payload.no_of_transfers,
                report_fields: payload.report_fields,
            },
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(plan_report)))
}

async fn add_location_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_report_id): Path<Uuid>,
    Json(payload): Json<AddLocationReportRequest>,
) -> Result<impl IntoResponse, Response> {
    let entries = ReportEntryRepository::new((*state.db).clone());
    let report = entries
        .report_of_plan_report(plan_report_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), report.project_id).await?;

    let location_report = entries
        .add_location_report(
            plan_report_id,
            AddLocationReportInput {
                target_location_id: payload.target_location_id,
                country_id: payload.country_id,
                province_id: payload.province_id,
                district_id: payload.district_id,
                zone_id: payload.zone_id,
                location_type_id: payload.location_type_id,
                facility_site_type_id: payload.facility_site_type_id,
                beneficiary_status: payload.beneficiary_status,
                values: payload.disaggregations,
            },
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(location_report)))
}

async fn replace_values(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(location_report_id): Path<Uuid>,
    Json(payload): Json<ReplaceValuesRequest>,
) -> Result<impl IntoResponse, Response> {
    let entries = ReportEntryRepository::new((*state.db).clone());
    let report = entries
        .report_of_location_report(location_report_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), report.project_id).await?;

    let rows = entries
        .replace_values(location_report_id, payload.disaggregations)
        .await
        .map_err(error_response)?;
    Ok(Json(rows))
}

async fn delete_location_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(location_report_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let entries = ReportEntryRepository::new((*state.db).clone());
    let report = entries
        .report_of_location_report(location_report_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), report.project_id).await?;

    entries
        .delete_location_report(location_report_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn entry_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_report_id): Path<Uuid>,
    Query(query): Query<EntryTemplateQuery>,
) -> Result<impl IntoResponse, Response> {
    let entries = ReportEntryRepository::new((*state.db).clone());
    let report = entries
        .report_of_plan_report(plan_report_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), report.project_id).await?;

    let rows = entries
        .entry_template(
            plan_report_id,
            query.location_report_id,
            query.extra.min(MAX_EXTRA_ROWS),
        )
        .await
        .map_err(error_response)?;
    Ok(Json(rows))
}

async fn target_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((target_location_id, disaggregation_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, Response> {
    let location = ProjectRepository::new((*state.db).clone())
        .find_target_location(target_location_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), location.project_id).await?;

    let progress = ReportEntryRepository::new((*state.db).clone())
        .target_and_reached(target_location_id, disaggregation_id)
        .await
        .map_err(error_response)?;
    Ok(Json(progress))
}
