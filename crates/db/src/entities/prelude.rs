//! Entity re-exports.

pub use super::activity_details::Entity as ActivityDetails;
pub use super::activity_domain_clusters::Entity as ActivityDomainClusters;
pub use super::activity_domains::Entity as ActivityDomains;
pub use super::activity_plan_reports::Entity as ActivityPlanReports;
pub use super::activity_plans::Entity as ActivityPlans;
pub use super::activity_types::Entity as ActivityTypes;
pub use super::beneficiary_types::Entity as BeneficiaryTypes;
pub use super::cluster_countries::Entity as ClusterCountries;
pub use super::clusters::Entity as Clusters;
pub use super::disaggregation_clusters::Entity as DisaggregationClusters;
pub use super::disaggregation_location_reports::Entity as DisaggregationLocationReports;
pub use super::disaggregation_locations::Entity as DisaggregationLocations;
pub use super::disaggregations::Entity as Disaggregations;
pub use super::donors::Entity as Donors;
pub use super::facility_site_types::Entity as FacilitySiteTypes;
pub use super::import_aliases::Entity as ImportAliases;
pub use super::indicator_activity_types::Entity as IndicatorActivityTypes;
pub use super::indicator_disaggregations::Entity as IndicatorDisaggregations;
pub use super::indicators::Entity as Indicators;
pub use super::location_types::Entity as LocationTypes;
pub use super::locations::Entity as Locations;
pub use super::organization_clusters::Entity as OrganizationClusters;
pub use super::organizations::Entity as Organizations;
pub use super::project_activity_domains::Entity as ProjectActivityDomains;
pub use super::project_clusters::Entity as ProjectClusters;
pub use super::project_donors::Entity as ProjectDonors;
pub use super::project_implementing_partners::Entity as ProjectImplementingPartners;
pub use super::project_monthly_reports::Entity as ProjectMonthlyReports;
pub use super::projects::Entity as Projects;
pub use super::target_location_reports::Entity as TargetLocationReports;
pub use super::target_locations::Entity as TargetLocations;
pub use super::user_groups::Entity as UserGroups;
pub use super::users::Entity as Users;
