//! Planning and monthly report trees.
//!
//! Every child row cascades with its parent. Reference data is either
//! restricted or nulled out on delete.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: PROJECTS
        // ============================================================
        db.execute_unprepared(PROJECTS_SQL).await?;
        db.execute_unprepared(PROJECT_LINKS_SQL).await?;

        // ============================================================
        // PART 2: PLANNING TREE
        // ============================================================
        db.execute_unprepared(ACTIVITY_PLANS_SQL).await?;
        db.execute_unprepared(TARGET_LOCATIONS_SQL).await?;
        db.execute_unprepared(DISAGGREGATION_LOCATIONS_SQL).await?;

        // ============================================================
        // PART 3: REPORT TREE
        // ============================================================
        db.execute_unprepared(MONTHLY_REPORTS_SQL).await?;
        db.execute_unprepared(ACTIVITY_PLAN_REPORTS_SQL).await?;
        db.execute_unprepared(TARGET_LOCATION_REPORTS_SQL).await?;
        db.execute_unprepared(DISAGGREGATION_LOCATION_REPORTS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE RESTRICT,
    user_id UUID REFERENCES users(id) ON DELETE SET NULL,
    code VARCHAR(200) NOT NULL UNIQUE,
    title VARCHAR(500) NOT NULL,
    hrp_code VARCHAR(200),
    description TEXT,
    budget NUMERIC(19, 2),
    budget_currency CHAR(3),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    state project_state NOT NULL DEFAULT 'draft',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_project_title_length CHECK (char_length(btrim(title)) >= 6),
    CONSTRAINT chk_project_dates CHECK (end_date >= start_date)
);

CREATE INDEX idx_projects_organization ON projects(organization_id);
CREATE INDEX idx_projects_state ON projects(state);
";

const PROJECT_LINKS_SQL: &str = r"
CREATE TABLE project_clusters (
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    cluster_id UUID NOT NULL REFERENCES clusters(id) ON DELETE RESTRICT,
    PRIMARY KEY (project_id, cluster_id)
);

CREATE INDEX idx_project_clusters_cluster ON project_clusters(cluster_id);

CREATE TABLE project_activity_domains (
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    activity_domain_id UUID NOT NULL REFERENCES activity_domains(id) ON DELETE RESTRICT,
    PRIMARY KEY (project_id, activity_domain_id)
);

CREATE TABLE project_donors (
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    donor_id UUID NOT NULL REFERENCES donors(id) ON DELETE RESTRICT,
    PRIMARY KEY (project_id, donor_id)
);

CREATE TABLE project_implementing_partners (
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE RESTRICT,
    PRIMARY KEY (project_id, organization_id)
);
";

const ACTIVITY_PLANS_SQL: &str = r"
CREATE TABLE activity_plans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    activity_domain_id UUID NOT NULL REFERENCES activity_domains(id) ON DELETE RESTRICT,
    activity_type_id UUID NOT NULL REFERENCES activity_types(id) ON DELETE RESTRICT,
    activity_detail_id UUID REFERENCES activity_details(id) ON DELETE SET NULL,
    indicator_id UUID NOT NULL REFERENCES indicators(id) ON DELETE RESTRICT,
    beneficiary_id UUID REFERENCES beneficiary_types(id) ON DELETE SET NULL,
    hrp_beneficiary_id UUID REFERENCES beneficiary_types(id) ON DELETE SET NULL,
    beneficiary_category VARCHAR(255),
    description TEXT,
    state project_state NOT NULL DEFAULT 'draft',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_activity_plans_project ON activity_plans(project_id);
";

const TARGET_LOCATIONS_SQL: &str = r"
CREATE TABLE target_locations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    activity_plan_id UUID NOT NULL REFERENCES activity_plans(id) ON DELETE CASCADE,
    country_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    province_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    district_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    zone_id UUID REFERENCES locations(id) ON DELETE SET NULL,
    location_type_id UUID REFERENCES location_types(id) ON DELETE SET NULL,
    implementing_partner_id UUID REFERENCES organizations(id) ON DELETE SET NULL,
    facility_site_type_id UUID REFERENCES facility_site_types(id) ON DELETE SET NULL,
    facility_monitoring BOOLEAN NOT NULL DEFAULT false,
    facility_name VARCHAR(255),
    facility_id VARCHAR(255),
    facility_lat VARCHAR(50),
    facility_long VARCHAR(50),
    nhs_code VARCHAR(200),
    state project_state NOT NULL DEFAULT 'draft',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_target_locations_plan ON target_locations(activity_plan_id);
CREATE INDEX idx_target_locations_project ON target_locations(project_id);
";

const DISAGGREGATION_LOCATIONS_SQL: &str = r"
CREATE TABLE disaggregation_locations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    target_location_id UUID NOT NULL REFERENCES target_locations(id) ON DELETE CASCADE,
    disaggregation_id UUID NOT NULL REFERENCES disaggregations(id) ON DELETE RESTRICT,
    target BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_disaggregation_location UNIQUE (target_location_id, disaggregation_id),
    CONSTRAINT chk_disaggregation_location_target CHECK (target >= 0)
);
";

const MONTHLY_REPORTS_SQL: &str = r"
CREATE TABLE project_monthly_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    state report_state NOT NULL DEFAULT 'pending',
    from_date DATE,
    to_date DATE,
    description TEXT,
    comments TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    submitted_on TIMESTAMPTZ,
    approved_on TIMESTAMPTZ,
    rejected_on TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_report_period CHECK (from_date IS NULL OR to_date IS NULL OR to_date >= from_date)
);

CREATE INDEX idx_monthly_reports_project ON project_monthly_reports(project_id, from_date);
CREATE INDEX idx_monthly_reports_approved ON project_monthly_reports(project_id, approved_on DESC)
    WHERE state = 'completed';
";

const ACTIVITY_PLAN_REPORTS_SQL: &str = r"
CREATE TABLE activity_plan_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    monthly_report_id UUID NOT NULL REFERENCES project_monthly_reports(id) ON DELETE CASCADE,
    activity_plan_id UUID NOT NULL REFERENCES activity_plans(id) ON DELETE CASCADE,
    indicator_id UUID NOT NULL REFERENCES indicators(id) ON DELETE RESTRICT,
    target_achieved BIGINT NOT NULL DEFAULT 0,
    response_types JSONB NOT NULL DEFAULT '[]',
    units BIGINT,
    no_of_transfers INTEGER,
    report_fields JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_no_of_transfers CHECK (no_of_transfers IS NULL OR no_of_transfers BETWEEN 0 AND 30),
    CONSTRAINT chk_units CHECK (units IS NULL OR units >= 0)
);

CREATE INDEX idx_activity_plan_reports_report ON activity_plan_reports(monthly_report_id);
";

const TARGET_LOCATION_REPORTS_SQL: &str = r"
CREATE TABLE target_location_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    activity_plan_report_id UUID NOT NULL REFERENCES activity_plan_reports(id) ON DELETE CASCADE,
    target_location_id UUID REFERENCES target_locations(id) ON DELETE SET NULL,
    country_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    province_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    district_id UUID NOT NULL REFERENCES locations(id) ON DELETE RESTRICT,
    zone_id UUID REFERENCES locations(id) ON DELETE SET NULL,
    location_type_id UUID REFERENCES location_types(id) ON DELETE SET NULL,
    facility_site_type_id UUID REFERENCES facility_site_types(id) ON DELETE SET NULL,
    beneficiary_status beneficiary_status NOT NULL DEFAULT 'new_beneficiary',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_target_location_reports_plan_report ON target_location_reports(activity_plan_report_id);
CREATE INDEX idx_target_location_reports_target ON target_location_reports(target_location_id);
";

const DISAGGREGATION_LOCATION_REPORTS_SQL: &str = r"
CREATE TABLE disaggregation_location_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    target_location_report_id UUID NOT NULL REFERENCES target_location_reports(id) ON DELETE CASCADE,
    disaggregation_id UUID NOT NULL REFERENCES disaggregations(id) ON DELETE RESTRICT,
    target BIGINT NOT NULL DEFAULT 0,
    target_required BIGINT NOT NULL DEFAULT 0,
    reached BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_disaggregation_report_values
        CHECK (target >= 0 AND target_required >= 0 AND reached >= 0)
);

CREATE INDEX idx_disaggregation_reports_location_report
    ON disaggregation_location_reports(target_location_report_id);
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_projects_updated_at
    BEFORE UPDATE ON projects
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_activity_plans_updated_at
    BEFORE UPDATE ON activity_plans
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_target_locations_updated_at
    BEFORE UPDATE ON target_locations
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_monthly_reports_updated_at
    BEFORE UPDATE ON project_monthly_reports
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_activity_plan_reports_updated_at
    BEFORE UPDATE ON activity_plan_reports
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_activity_plan_reports_updated_at ON activity_plan_reports;
DROP TRIGGER IF EXISTS trg_monthly_reports_updated_at ON project_monthly_reports;
DROP TRIGGER IF EXISTS trg_target_locations_updated_at ON target_locations;
DROP TRIGGER IF EXISTS trg_activity_plans_updated_at ON activity_plans;
DROP TRIGGER IF EXISTS trg_projects_updated_at ON projects;

DROP TABLE IF EXISTS disaggregation_location_reports CASCADE;
DROP TABLE IF EXISTS target_location_reports CASCADE;
DROP TABLE IF EXISTS activity_plan_reports CASCADE;
DROP TABLE IF EXISTS project_monthly_reports CASCADE;
DROP TABLE IF EXISTS disaggregation_locations CASCADE;
DROP TABLE IF EXISTS target_locations CASCADE;
DROP TABLE IF EXISTS activity_plans CASCADE;
DROP TABLE IF EXISTS project_implementing_partners CASCADE;
DROP TABLE IF EXISTS project_donors CASCADE;
DROP TABLE IF EXISTS project_activity_domains CASCADE;
DROP TABLE IF EXISTS project_clusters CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
";
