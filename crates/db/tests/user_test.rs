//! Integration tests for User repository.

mod common;

use sea_orm::EntityTrait;

use common::{connect, suffix};
use reporthub_core::access::cluster_lead_group;
use reporthub_db::{UserRepository, entities::users};

#[tokio::test]
async fn test_user_create_and_find() {
    let db = connect().await;
    let repo = UserRepository::new(db.clone());
    let email = format!("lead-{}@example.com", suffix().to_lowercase());
    let group = cluster_lead_group("wash");

    let user = repo
        .create(&email, "Cluster Lead", None, false, std::slice::from_ref(&group))
        .await
        .expect("Failed to create user");
    assert_eq!(user.email, email);
    assert!(!user.is_superuser);

    let by_email = repo
        .find_by_email(&email)
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert_eq!(by_email.id, user.id);

    let by_id = repo.find_by_id(user.id).await.expect("Failed to query");
    assert!(by_id.is_some());

    let groups = repo.groups(user.id).await.expect("Failed to query");
    assert_eq!(groups, vec![group]);

    users::Entity::delete_by_id(user.id).exec(&db).await.ok();
}

#[tokio::test]
async fn test_user_without_groups() {
    let db = connect().await;
    let repo = UserRepository::new(db.clone());
    let email = format!("member-{}@example.com", suffix().to_lowercase());

    let user = repo
        .create(&email, "Member", None, true, &[])
        .await
        .expect("Failed to create user");
    assert!(user.is_superuser);
    assert!(repo.groups(user.id).await.expect("Failed to query").is_empty());

    users::Entity::delete_by_id(user.id).exec(&db).await.ok();
}
