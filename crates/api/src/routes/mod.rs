//! API route definitions.

use axum::{Router, middleware, response::Response};
use uuid::Uuid;

use crate::{AppState, error::error_response, middleware::auth::auth_middleware};
use reporthub_core::access::{AccessPolicy, Actor, ProjectScope};
use reporthub_db::{MonthlyReportRepository, ProjectRepository, entities::project_monthly_reports};

pub mod dashboards;
pub mod entries;
pub mod health;
pub mod locations;
pub mod monthly_reports;
pub mod planning;
pub mod projects;
pub mod spreadsheets;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(locations::routes())
        .merge(projects::routes())
        .merge(planning::routes())
        .merge(monthly_reports::routes())
        .merge(entries::routes())
        .merge(spreadsheets::routes())
        .merge(dashboards::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

// ============================================================================
// Access helpers
// ============================================================================

/// Loads the project's scope and checks the caller may edit it.
pub(crate) async fn editable_project(
    state: &AppState,
    actor: &Actor,
    project_id: Uuid,
) -> Result<ProjectScope, Response> {
    let scope = ProjectRepository::new((*state.db).clone())
        .scope(project_id)
        .await
        .map_err(error_response)?;
    AccessPolicy::ensure_can_edit_project(actor, &scope).map_err(error_response)?;
    Ok(scope)
}

/// Loads a monthly report and checks the caller may edit its project.
pub(crate) async fn editable_report(
    state: &AppState,
    actor: &Actor,
    report_id: Uuid,
) -> Result<(project_monthly_reports::Model, ProjectScope), Response> {
    let report = MonthlyReportRepository::new((*state.db).clone(), state.reporting)
        .find(report_id)
        .await
        .map_err(error_response)?;
    let scope = editable_project(state, actor, report.project_id).await?;
    Ok((report, scope))
}
