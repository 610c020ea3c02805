//! Integration tests for Organization repository.
//!
//! Covers creation with cluster links and the lookups used by the
//! organization dashboard.

mod common;

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use common::{connect, suffix};
use reporthub_db::{
    OrganizationRepository,
    entities::{clusters, organizations},
};

async fn cluster(db: &sea_orm::DatabaseConnection, code: &str) -> clusters::Model {
    clusters::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set(code.to_string()),
        title: Set(format!("Cluster {code}")),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create cluster")
}

#[tokio::test]
async fn test_create_and_find_by_code() {
    let db = connect().await;
    let repo = OrganizationRepository::new(db.clone());
    let code = format!("NGO-{}", suffix());

    let org = repo
        .create(&code, "Relief Partners", Some("NNGO"), &[])
        .await
        .expect("Failed to create organization");
    assert_eq!(org.code, code);
    assert_eq!(org.org_type.as_deref(), Some("NNGO"));

    let found = repo
        .find_by_code(&code)
        .await
        .expect("Failed to query")
        .expect("Organization should exist");
    assert_eq!(found.id, org.id);

    let by_id = repo.find_by_id(org.id).await.expect("Failed to query");
    assert_eq!(by_id.map(|o| o.name), Some("Relief Partners".to_string()));

    organizations::Entity::delete_by_id(org.id).exec(&db).await.ok();
}

#[tokio::test]
async fn test_find_by_code_missing() {
    let db = connect().await;
    let repo = OrganizationRepository::new(db);

    let found = repo
        .find_by_code(&format!("NOPE-{}", suffix()))
        .await
        .expect("Failed to query");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_cluster_codes_are_sorted() {
    let db = connect().await;
    let s = suffix().to_lowercase();
    let wash = cluster(&db, &format!("wash{s}")).await;
    let health = cluster(&db, &format!("health{s}")).await;

    let repo = OrganizationRepository::new(db.clone());
    let org = repo
        .create(&format!("ORG-{s}"), "Two Cluster NGO", None, &[wash.id, health.id])
        .await
        .expect("Failed to create organization");

    let codes = repo.cluster_codes(org.id).await.expect("Failed to query");
    assert_eq!(codes, vec![health.code.clone(), wash.code.clone()]);

    organizations::Entity::delete_by_id(org.id).exec(&db).await.ok();
    clusters::Entity::delete_by_id(wash.id).exec(&db).await.ok();
    clusters::Entity::delete_by_id(health.id).exec(&db).await.ok();
}
