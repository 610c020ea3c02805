//! Planned tree routes: activity plans, target locations and plan imports.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
    routes::{editable_project, spreadsheets::read_upload},
};
use reporthub_db::{
    ImportRepository, ProjectRepository,
    repositories::{CreateActivityPlanInput, CreateTargetLocationInput},
};

/// Creates the planning routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects/{id}/activity-plans", post(create_activity_plan))
        .route("/projects/{id}/activity-plans/import", post(import_plans))
        .route("/activity-plans/{id}/copy", post(copy_activity_plan))
        .route(
            "/activity-plans/{id}/target-locations",
            post(create_target_location),
        )
        .route("/target-locations/{id}/copy", post(copy_target_location))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for adding an activity plan.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityPlanRequest {
    /// Activity domain.
    pub activity_domain_id: Uuid,
    /// Activity type inside the domain.
    pub activity_type_id: Uuid,
    /// Optional activity detail.
    pub activity_detail_id: Option<Uuid>,
    /// Indicator measured under the activity type.
    pub indicator_id: Uuid,
    /// Beneficiary type.
    pub beneficiary_id: Option<Uuid>,
    /// HRP beneficiary type.
    pub hrp_beneficiary_id: Option<Uuid>,
    /// Beneficiary category.
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub beneficiary_category: Option<String>,
    /// Free text.
    pub description: Option<String>,
}

/// Planned target for one disaggregation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlannedTarget {
    /// Disaggregation.
    pub disaggregation_id: Uuid,
    /// Planned people.
    pub target: i64,
}

/// Request body for adding a target location.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTargetLocationRequest {
    /// Country.
    pub country_id: Uuid,
    /// Province.
    pub province_id: Uuid,
    /// District.
    pub district_id: Uuid,
    /// Zone.
    pub zone_id: Option<Uuid>,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Implementing partner organization.
    pub implementing_partner_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// Facility monitoring flag.
    #[serde(default)]
    pub facility_monitoring: bool,
    /// Facility name.
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub facility_name: Option<String>,
    /// Facility id.
    pub facility_id: Option<String>,
    /// Facility latitude.
    pub facility_lat: Option<String>,
    /// Facility longitude.
    pub facility_long: Option<String>,
    /// NHS code.
    pub nhs_code: Option<String>,
    /// Targets per disaggregation.
    #[serde(default)]
    pub targets: Vec<PlannedTarget>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_activity_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateActivityPlanRequest>,
) -> Result<impl IntoResponse, Response> {
    payload.validate().map_err(|e| validation_response(&e))?;
    editable_project(&state, auth.actor(), project_id).await?;

    let plan = ProjectRepository::new((*state.db).clone())
        .create_activity_plan(
            project_id,
            CreateActivityPlanInput {
                activity_domain_id: payload.activity_domain_id,
                activity_type_id: payload.activity_type_id,
                activity_detail_id: payload.activity_detail_id,
                indicator_id: payload.indicator_id,
                beneficiary_id: payload.beneficiary_id,
                hrp_beneficiary_id: payload.hrp_beneficiary_id,
                beneficiary_category: payload.beneficiary_category,
                description: payload.description,
            },
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn create_target_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(activity_plan_id): Path<Uuid>,
    Json(payload): Json<CreateTargetLocationRequest>,
) -> Result<impl IntoResponse, Response> {
    payload.validate().map_err(|e| validation_response(&e))?;
    let projects = ProjectRepository::new((*state.db).clone());
    let plan = projects
        .find_activity_plan(activity_plan_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), plan.project_id).await?;

    let location = projects
        .create_target_location(
            activity_plan_id,
            CreateTargetLocationInput {
                country_id: payload.country_id,
                province_id: payload.province_id,
                district_id: payload.district_id,
                zone_id: payload.zone_id,
                location_type_id: payload.location_type_id,
                implementing_partner_id: payload.implementing_partner_id,
                facility_site_type_id: payload.facility_site_type_id,
                facility_monitoring: payload.facility_monitoring,
                facility_name: payload.facility_name,
                facility_id: payload.facility_id,
                facility_lat: payload.facility_lat,
                facility_long: payload.facility_long,
                nhs_code: payload.nhs_code,
                targets: payload
                    .targets
                    .iter()
                    .map(|t| (t.disaggregation_id, t.target))
                    .collect(),
            },
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn copy_activity_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(activity_plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let projects = ProjectRepository::new((*state.db).clone());
    let plan = projects
        .find_activity_plan(activity_plan_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), plan.project_id).await?;

    let copy = projects
        .copy_activity_plan(activity_plan_id)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(copy)))
}

async fn copy_target_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target_location_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let projects = ProjectRepository::new((*state.db).clone());
    let location = projects
        .find_target_location(target_location_id)
        .await
        .map_err(error_response)?;
    editable_project(&state, auth.actor(), location.project_id).await?;

    let copy = projects
        .copy_target_location(target_location_id)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(copy)))
}

async fn import_plans(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), project_id).await?;
    let file = read_upload(multipart).await?;

    let summary = ImportRepository::new((*state.db).clone(), state.import_max_rows)
        .import_plans(project_id, &file[..])
        .await
        .map_err(error_response)?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_location_defaults() {
        let payload: CreateTargetLocationRequest = serde_json::from_value(serde_json::json!({
            "country_id": Uuid::nil(),
            "province_id": Uuid::nil(),
            "district_id": Uuid::nil(),
        }))
        .unwrap();
        assert!(!payload.facility_monitoring);
        assert!(payload.targets.is_empty());
        assert!(payload.validate().is_ok());
    }
}
