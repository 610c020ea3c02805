//! `SeaORM` active enums and their core counterparts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use reporthub_core::planning::ProjectState as CoreProjectState;
use reporthub_core::reporting::{
    BeneficiaryStatus as CoreBeneficiaryStatus, ReportState as CoreReportState,
};

/// `project_state` enum, shared by projects, plans and target locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_state")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// `report_state` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_state")]
#[serde(rename_all = "lowercase")]
pub enum ReportState {
    #[sea_orm(string_value = "todo")]
    Todo,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// `beneficiary_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "beneficiary_status")]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryStatus {
    #[sea_orm(string_value = "new_beneficiary")]
    NewBeneficiary,
    #[sea_orm(string_value = "existing_beneficiaries")]
    ExistingBeneficiaries,
}

// ============================================================================
// Conversions to and from core types
// ============================================================================

impl From<ProjectState> for CoreProjectState {
    fn from(state: ProjectState) -> Self {
        match state {
            ProjectState::Draft => Self::Draft,
            ProjectState::InProgress => Self::InProgress,
            ProjectState::Completed => Self::Completed,
            ProjectState::Archived => Self::Archived,
        }
    }
}

impl From<CoreProjectState> for ProjectState {
    fn from(state: CoreProjectState) -> Self {
        match state {
            CoreProjectState::Draft => Self::Draft,
            CoreProjectState::InProgress => Self::InProgress,
            CoreProjectState::Completed => Self::Completed,
            CoreProjectState::Archived => Self::Archived,
        }
    }
}

impl From<ReportState> for CoreReportState {
    fn from(state: ReportState) -> Self {
        match state {
            ReportState::Todo => Self::Todo,
            ReportState::Pending => Self::Pending,
            ReportState::Submitted => Self::Submitted,
            ReportState::Rejected => Self::Rejected,
            ReportState::Completed => Self::Completed,
            ReportState::Archived => Self::Archived,
        }
    }
}

impl From<CoreReportState> for ReportState {
    fn from(state: CoreReportState) -> Self {
        match state {
            CoreReportState::Todo => Self::Todo,
            CoreReportState::Pending => Self::Pending,
            CoreReportState::Submitted => Self::Submitted,
            CoreReportState::Rejected => Self::Rejected,
            CoreReportState::Completed => Self::Completed,
            CoreReportState::Archived => Self::Archived,
        }
    }
}

impl From<BeneficiaryStatus> for CoreBeneficiaryStatus {
    fn from(status: BeneficiaryStatus) -> Self {
        match status {
            BeneficiaryStatus::NewBeneficiary => Self::NewBeneficiary,
            BeneficiaryStatus::ExistingBeneficiaries => Self::ExistingBeneficiaries,
        }
    }
}

impl From<CoreBeneficiaryStatus> for BeneficiaryStatus {
    fn from(status: CoreBeneficiaryStatus) -> Self {
        match status {
            CoreBeneficiaryStatus::NewBeneficiary => Self::NewBeneficiary,
            CoreBeneficiaryStatus::ExistingBeneficiaries => Self::ExistingBeneficiaries,
        }
    }
}
