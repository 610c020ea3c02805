//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use reporthub_core::reporting::ReportingPolicy;
use reporthub_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Report lifecycle settings.
    pub reporting: ReportingPolicy,
    /// Upper bound on data rows per import file.
    pub import_max_rows: usize,
    /// Upper bound on request bodies, in bytes.
    pub upload_limit_bytes: usize,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(state.upload_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use reporthub_core::access::cluster_lead_group;
    use reporthub_shared::config::JwtConfig;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// State whose database is never reached by the requests below.
    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(&JwtConfig {
                secret: "router-test-secret".to_string(),
                access_token_expiry_secs: 900,
            })),
            reporting: ReportingPolicy::default(),
            import_max_rows: 100,
            upload_limit_bytes: 1024,
        }
    }

    fn token(state: &AppState, groups: Vec<String>) -> String {
        state
            .jwt_service
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), groups, false)
            .unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_missing_database() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::get("/api/v1/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/v1/projects").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "missing_token");
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::get("/api/v1/projects")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "invalid_token");
    }

    #[tokio::test]
    async fn test_location_creation_needs_superuser() {
        let state = test_state();
        let token = token(&state, vec![]);
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::post("/api/v1/locations")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"level":0,"code":"AF","name":"Afghanistan"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_cluster_dashboard_needs_cluster_lead() {
        let state = test_state();
        let token = token(&state, vec![cluster_lead_group("health")]);
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::get("/api/v1/dashboards/clusters/wash")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
