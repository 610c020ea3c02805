//! Database seeder for ReportHub development and testing.
//!
//! Seeds a small reference catalogue (cluster, activity domain and type,
//! indicator, disaggregations and an Afghan location chain), an
//! organization and a cluster lead, then prints a bearer token for that
//! user.
//!
//! Usage: cargo run --bin seeder

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use reporthub_core::access::cluster_lead_group;
use reporthub_db::{
    LocationRepository, OrganizationRepository, UserRepository,
    entities::{
        activity_domains, activity_types, clusters, disaggregation_clusters, disaggregations,
        indicator_activity_types, indicator_disaggregations, indicators, locations,
    },
    repositories::CreateLocationInput,
};
use reporthub_shared::{AppConfig, JwtService};

const CLUSTER_CODE: &str = "wash";
const ORG_CODE: &str = "DEMO-NGO";
const USER_EMAIL: &str = "lead@reporthub.dev";

/// Location chain seeded as `(parent, level, code, name)`.
const LOCATIONS: [(Option<&str>, i16, &str, &str); 3] = [
    (None, 0, "AF", "Afghanistan"),
    (Some("AF"), 1, "AF01", "Kabul"),
    (Some("AF01"), 2, "AF0101", "Kabul City"),
];

/// Disaggregations seeded as `(name, gender, lower, upper)`.
const DISAGGREGATIONS: [(&str, &str, i32, i32); 4] = [
    ("Girls (0-17)", "female", 0, 17),
    ("Boys (0-17)", "male", 0, 17),
    ("Women (18+)", "female", 18, 120),
    ("Men (18+)", "male", 18, 120),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = reporthub_db::connect(&config.database.url).await?;

    println!("Seeding reference data...");
    let cluster_id = seed_reference_data(&db).await?;

    println!("Seeding locations...");
    seed_locations(&db).await?;

    println!("Seeding organization and cluster lead...");
    let (user_id, organization_id) = seed_lead(&db, cluster_id).await?;

    let token = JwtService::new(&config.jwt).generate_access_token(
        user_id,
        organization_id,
        vec![cluster_lead_group(CLUSTER_CODE)],
        false,
    )?;

    println!("Seeding complete!");
    println!("  User:  {USER_EMAIL}");
    println!("  Token: {token}");
    Ok(())
}

/// Seeds the catalogue and returns the cluster id. Skips when the cluster exists.
async fn seed_reference_data(db: &DatabaseConnection) -> anyhow::Result<Uuid> {
    if let Some(cluster) = clusters::Entity::find()
        .filter(clusters::Column::Code.eq(CLUSTER_CODE))
        .one(db)
        .await?
    {
        println!("  Cluster {CLUSTER_CODE} already exists, skipping...");
        return Ok(cluster.id);
    }

    let cluster = clusters::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set(CLUSTER_CODE.to_string()),
        title: Set("Water, Sanitation and Hygiene".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let domain = activity_domains::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set("WASH-WATER".to_string()),
        name: Set("Access to water".to_string()),
        is_active: Set(true),
    }
    .insert(db)
    .await?;

    let activity_type = activity_types::ActiveModel {
        id: Set(Uuid::now_v7()),
        activity_domain_id: Set(domain.id),
        code: Set("WASH-WATER-TRUCKING".to_string()),
        name: Set("Water trucking".to_string()),
        fields: Set(None),
        is_active: Set(true),
    }
    .insert(db)
    .await?;

    let indicator = indicators::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set("# of people receiving safe drinking water".to_string()),
        description: Set(None),
    }
    .insert(db)
    .await?;

    indicator_activity_types::ActiveModel {
        indicator_id: Set(indicator.id),
        activity_type_id: Set(activity_type.id),
    }
    .insert(db)
    .await?;

    for (name, gender, lower, upper) in DISAGGREGATIONS {
        let disaggregation = disaggregations::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            gender: Set(Some(gender.to_string())),
            lower_limit: Set(Some(lower)),
            upper_limit: Set(Some(upper)),
        }
        .insert(db)
        .await?;

        indicator_disaggregations::ActiveModel {
            indicator_id: Set(indicator.id),
            disaggregation_id: Set(disaggregation.id),
        }
        .insert(db)
        .await?;
        disaggregation_clusters::ActiveModel {
            disaggregation_id: Set(disaggregation.id),
            cluster_id: Set(cluster.id),
        }
        .insert(db)
        .await?;
    }

    println!("  Created cluster {CLUSTER_CODE} with 1 indicator and 4 disaggregations");
    Ok(cluster.id)
}

async fn seed_locations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = LocationRepository::new(db.clone());
    for (parent, level, code, name) in LOCATIONS {
        if locations::Entity::find()
            .filter(locations::Column::Code.eq(code))
            .one(db)
            .await?
            .is_some()
        {
            println!("  Location {code} already exists, skipping...");
            continue;
        }

        repo.create(CreateLocationInput {
            parent_code: parent.map(ToString::to_string),
            level,
            code: code.to_string(),
            name: name.to_string(),
            region_name: None,
            location_type: None,
            lat: None,
            long: None,
        })
        .await?;
        println!("  Created location {code} ({name})");
    }
    Ok(())
}

/// Returns `(user_id, organization_id)` of the seeded cluster lead.
async fn seed_lead(db: &DatabaseConnection, cluster_id: Uuid) -> anyhow::Result<(Uuid, Uuid)> {
    let organizations = OrganizationRepository::new(db.clone());
    let organization = match organizations.find_by_code(ORG_CODE).await? {
        Some(org) => org,
        None => {
            organizations
                .create(ORG_CODE, "Demo NGO", Some("INGO"), &[cluster_id])
                .await?
        }
    };

    let users = UserRepository::new(db.clone());
    let user = match users.find_by_email(USER_EMAIL).await? {
        Some(user) => user,
        None => {
            users
                .create(
                    USER_EMAIL,
                    "Demo Cluster Lead",
                    Some(organization.id),
                    false,
                    &[cluster_lead_group(CLUSTER_CODE)],
                )
                .await?
        }
    };

    Ok((user.id, organization.id))
}
