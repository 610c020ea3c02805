//! Project routes: creation, detail and lifecycle.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
    routes::editable_project,
};
use reporthub_db::{ProjectRepository, repositories::CreateProjectInput};
use reporthub_shared::types::{PageRequest, PageResponse};

/// Creates the project routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project).delete(delete_project))
        .route("/projects/{id}/submit", post(submit_project))
        .route("/projects/{id}/archive", post(archive_project))
        .route("/projects/{id}/unarchive", post(unarchive_project))
        .route("/projects/{id}/complete", post(complete_project))
        .route("/projects/{id}/copy", post(copy_project))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a project.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Unique project code.
    #[validate(length(min = 1, max = 64, message = "must be 1 to 64 characters"))]
    pub code: String,
    /// Project title.
    #[validate(length(min = 6, max = 255, message = "must be 6 to 255 characters"))]
    pub title: String,
    /// Humanitarian response plan code.
    pub hrp_code: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Budget amount.
    pub budget: Option<Decimal>,
    /// ISO currency of the budget.
    #[validate(length(equal = 3, message = "must be a 3-letter currency code"))]
    pub budget_currency: Option<String>,
    /// First day of the project.
    pub start_date: NaiveDate,
    /// Last day of the project.
    pub end_date: NaiveDate,
    /// Clusters the project reports to.
    #[validate(length(min = 1, message = "needs at least one cluster"))]
    pub cluster_ids: Vec<Uuid>,
    /// Activity domains the project plans in.
    #[serde(default)]
    pub activity_domain_ids: Vec<Uuid>,
    /// Funding organizations.
    #[serde(default)]
    pub donor_ids: Vec<Uuid>,
    /// Implementing partners.
    #[serde(default)]
    pub implementing_partner_ids: Vec<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, Response> {
    let page = page.normalized();
    let (projects, total) = ProjectRepository::new((*state.db).clone())
        .list(auth.organization_id(), &page)
        .await
        .map_err(error_response)?;
    Ok(Json(PageResponse::new(projects, &page, total)))
}

async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, Response> {
    payload.validate().map_err(|e| validation_response(&e))?;

    let project = ProjectRepository::new((*state.db).clone())
        .create(CreateProjectInput {
            organization_id: auth.organization_id(),
            user_id: auth.user_id(),
            code: payload.code.trim().to_string(),
            title: payload.title,
            hrp_code: payload.hrp_code,
            description: payload.description,
            budget: payload.budget,
            budget_currency: payload.budget_currency,
            start_date: payload.start_date,
            end_date: payload.end_date,
            cluster_ids: payload.cluster_ids,
            activity_domain_ids: payload.activity_domain_ids,
            donor_ids: payload.donor_ids,
            implementing_partner_ids: payload.implementing_partner_ids,
        })
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let detail = ProjectRepository::new((*state.db).clone())
        .detail(id)
        .await
        .map_err(error_response)?;
    Ok(Json(detail))
}

async fn submit_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let project = ProjectRepository::new((*state.db).clone())
        .submit(id)
        .await
        .map_err(error_response)?;
    Ok(Json(project))
}

async fn archive_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let project = ProjectRepository::new((*state.db).clone())
        .archive(id)
        .await
        .map_err(error_response)?;
    Ok(Json(project))
}

async fn unarchive_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let project = ProjectRepository::new((*state.db).clone())
        .unarchive(id)
        .await
        .map_err(error_response)?;
    Ok(Json(project))
}

async fn complete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let project = ProjectRepository::new((*state.db).clone())
        .complete(id)
        .await
        .map_err(error_response)?;
    Ok(Json(project))
}

async fn copy_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    let project = ProjectRepository::new((*state.db).clone())
        .copy_project(id, auth.user_id())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), id).await?;
    ProjectRepository::new((*state.db).clone())
        .delete(id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
