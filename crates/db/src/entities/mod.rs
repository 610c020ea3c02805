//! `SeaORM` entities.

pub mod prelude;

pub mod activity_details;
pub mod activity_domain_clusters;
pub mod activity_domains;
pub mod activity_plan_reports;
pub mod activity_plans;
pub mod activity_types;
pub mod beneficiary_types;
pub mod cluster_countries;
pub mod clusters;
pub mod disaggregation_clusters;
pub mod disaggregation_location_reports;
pub mod disaggregation_locations;
pub mod disaggregations;
pub mod donors;
pub mod facility_site_types;
pub mod import_aliases;
pub mod indicator_activity_types;
pub mod indicator_disaggregations;
pub mod indicators;
pub mod location_types;
pub mod locations;
pub mod organization_clusters;
pub mod organizations;
pub mod project_activity_domains;
pub mod project_clusters;
pub mod project_donors;
pub mod project_implementing_partners;
pub mod project_monthly_reports;
pub mod projects;
pub mod target_location_reports;
pub mod target_locations;
pub mod user_groups;
pub mod users;
pub mod sea_orm_active_enums;
