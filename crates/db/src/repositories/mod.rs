//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod dashboard;
pub mod export;
pub mod import;
pub mod location;
pub mod monthly_report;
pub mod organization;
pub mod project;
pub mod reference;
pub mod report_entry;
pub mod user;

pub use dashboard::{ClusterDashboard, DashboardError, DashboardRepository, OrganizationDashboard};
pub use export::ExportRepository;
pub use import::ImportRepository;
pub use location::{CreateLocationInput, LocationRepository};
pub use monthly_report::{
    CreateMonthlyReportInput, LocationReportTree, MonthlyReportRepository, MonthlyReportTree,
    PlanReportTree, SyncOutcome,
};
pub use organization::OrganizationRepository;
pub use project::{
    ActivityPlanTree, CreateActivityPlanInput, CreateProjectInput, CreateTargetLocationInput,
    ProjectDetail, ProjectRepository, TargetLocationTree,
};
pub use reference::ReferenceRepository;
pub use report_entry::{AddLocationReportInput, AddPlanReportInput, ReportEntryRepository};
pub use user::UserRepository;
