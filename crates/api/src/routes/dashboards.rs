//! 5W dashboard routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{AppState, error::error_response, middleware::AuthUser};
use reporthub_core::access::AccessPolicy;
use reporthub_db::{DashboardRepository, OrganizationRepository, repositories::DashboardError};
use reporthub_shared::types::OrganizationId;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboards/clusters/{code}", get(cluster_dashboard))
        .route("/dashboards/organizations/{code}", get(organization_dashboard))
        .route("/dashboards/reports", get(report_state_counts))
}

async fn cluster_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, Response> {
    AccessPolicy::ensure_cluster_lead(auth.actor(), &code).map_err(error_response)?;
    let dashboard = DashboardRepository::new((*state.db).clone())
        .cluster(&code)
        .await
        .map_err(error_response)?;
    Ok(Json(dashboard))
}

async fn organization_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let organizations = OrganizationRepository::new((*state.db).clone());
    let organization = organizations
        .find_by_code(code.trim())
        .await
        .map_err(|e| error_response(DashboardError::from(e)))?
        .ok_or_else(|| error_response(DashboardError::OrganizationNotFound(code.clone())))?;
    let cluster_codes = organizations
        .cluster_codes(organization.id)
        .await
        .map_err(|e| error_response(DashboardError::from(e)))?;

    AccessPolicy::ensure_can_view_org_dashboard(
        auth.actor(),
        OrganizationId::from_uuid(organization.id),
        &cluster_codes,
    )
    .map_err(error_response)?;

    let dashboard = DashboardRepository::new((*state.db).clone())
        .organization(&organization.code)
        .await
        .map_err(error_response)?;
    Ok(Json(dashboard))
}

async fn report_state_counts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, Response> {
    let actor = auth.actor();
    let led = actor.led_clusters();
    let scope = if actor.is_superuser {
        None
    } else {
        Some(led.as_slice())
    };

    let counts = DashboardRepository::new((*state.db).clone())
        .report_state_counts(scope)
        .await
        .map_err(error_response)?;
    Ok(Json(counts))
}
