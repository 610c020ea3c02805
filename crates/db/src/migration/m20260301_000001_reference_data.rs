//! Reference data migration.
//!
//! Creates the enums, the location tree, clusters, organizations, users and
//! the activity taxonomy that projects and reports point at.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS AND HELPERS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(UPDATED_AT_SQL).await?;

        // ============================================================
        // PART 2: LOCATIONS
        // ============================================================
        db.execute_unprepared(LOCATIONS_SQL).await?;

        // ============================================================
        // PART 3: CLUSTERS, ORGANIZATIONS, USERS
        // ============================================================
        db.execute_unprepared(CLUSTERS_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 4: ACTIVITY TAXONOMY
        // ============================================================
        db.execute_unprepared(ACTIVITY_TAXONOMY_SQL).await?;
        db.execute_unprepared(DISAGGREGATIONS_SQL).await?;
        db.execute_unprepared(LOOKUP_TABLES_SQL).await?;

        // ============================================================
        // PART 5: IMPORT ALIASES
        // ============================================================
        db.execute_unprepared(IMPORT_ALIASES_SQL).await?;

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

const ENUMS_SQL: &str = r"
CREATE TYPE project_state AS ENUM ('draft', 'in-progress', 'completed', 'archived');

CREATE TYPE report_state AS ENUM (
    'todo',
    'pending',
    'submitted',
    'rejected',
    'completed',
    'archived'
);

CREATE TYPE beneficiary_status AS ENUM ('new_beneficiary', 'existing_beneficiaries');
";

const UPDATED_AT_SQL: &str = r"
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const LOCATIONS_SQL: &str = r"
CREATE TABLE locations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    parent_id UUID REFERENCES locations(id) ON DELETE CASCADE,
    level SMALLINT NOT NULL,
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    region_name VARCHAR(255),
    location_type VARCHAR(100),
    lat VARCHAR(50),
    long VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_location_level CHECK (level BETWEEN 0 AND 3),
    CONSTRAINT chk_country_has_no_parent CHECK ((level = 0) = (parent_id IS NULL))
);

CREATE INDEX idx_locations_parent ON locations(parent_id);
";

const CLUSTERS_SQL: &str = r"
CREATE TABLE clusters (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    title VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE cluster_countries (
    cluster_id UUID NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
    location_id UUID NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    PRIMARY KEY (cluster_id, location_id)
);
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    org_type VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE organization_clusters (
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    cluster_id UUID NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
    PRIMARY KEY (organization_id, cluster_id)
);

CREATE INDEX idx_organization_clusters_cluster ON organization_clusters(cluster_id);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    organization_id UUID REFERENCES organizations(id) ON DELETE SET NULL,
    is_superuser BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE user_groups (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_name VARCHAR(150) NOT NULL,
    PRIMARY KEY (user_id, group_name)
);
";

const ACTIVITY_TAXONOMY_SQL: &str = r"
CREATE TABLE activity_domains (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(100) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true
);

CREATE TABLE activity_domain_clusters (
    activity_domain_id UUID NOT NULL REFERENCES activity_domains(id) ON DELETE CASCADE,
    cluster_id UUID NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
    PRIMARY KEY (activity_domain_id, cluster_id)
);

CREATE TABLE activity_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    activity_domain_id UUID NOT NULL REFERENCES activity_domains(id) ON DELETE CASCADE,
    code VARCHAR(100) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    fields JSONB,
    is_active BOOLEAN NOT NULL DEFAULT true
);

CREATE INDEX idx_activity_types_domain ON activity_types(activity_domain_id);

CREATE TABLE activity_details (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    activity_type_id UUID NOT NULL REFERENCES activity_types(id) ON DELETE CASCADE,
    code VARCHAR(100) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL
);

CREATE TABLE indicators (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(500) NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE indicator_activity_types (
    indicator_id UUID NOT NULL REFERENCES indicators(id) ON DELETE CASCADE,
    activity_type_id UUID NOT NULL REFERENCES activity_types(id) ON DELETE CASCADE,
    PRIMARY KEY (indicator_id, activity_type_id)
);
";

const DISAGGREGATIONS_SQL: &str = r"
CREATE TABLE disaggregations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    gender VARCHAR(50),
    lower_limit INTEGER,
    upper_limit INTEGER
);

CREATE TABLE indicator_disaggregations (
    indicator_id UUID NOT NULL REFERENCES indicators(id) ON DELETE CASCADE,
    disaggregation_id UUID NOT NULL REFERENCES disaggregations(id) ON DELETE CASCADE,
    PRIMARY KEY (indicator_id, disaggregation_id)
);

CREATE TABLE disaggregation_clusters (
    disaggregation_id UUID NOT NULL REFERENCES disaggregations(id) ON DELETE CASCADE,
    cluster_id UUID NOT NULL REFERENCES clusters(id) ON DELETE CASCADE,
    PRIMARY KEY (disaggregation_id, cluster_id)
);
";

const LOOKUP_TABLES_SQL: &str = r"
CREATE TABLE beneficiary_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE
);

CREATE TABLE location_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE
);

CREATE TABLE facility_site_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE
);

CREATE TABLE donors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL
);
";

const IMPORT_ALIASES_SQL: &str = r"
CREATE TABLE import_aliases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind VARCHAR(50) NOT NULL,
    alias VARCHAR(500) NOT NULL,
    entity_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_import_aliases_kind_alias ON import_aliases(kind, lower(alias));
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS import_aliases CASCADE;
DROP TABLE IF EXISTS donors CASCADE;
DROP TABLE IF EXISTS facility_site_types CASCADE;
DROP TABLE IF EXISTS location_types CASCADE;
DROP TABLE IF EXISTS beneficiary_types CASCADE;
DROP TABLE IF EXISTS disaggregation_clusters CASCADE;
DROP TABLE IF EXISTS indicator_disaggregations CASCADE;
DROP TABLE IF EXISTS disaggregations CASCADE;
DROP TABLE IF EXISTS indicator_activity_types CASCADE;
DROP TABLE IF EXISTS indicators CASCADE;
DROP TABLE IF EXISTS activity_details CASCADE;
DROP TABLE IF EXISTS activity_types CASCADE;
DROP TABLE IF EXISTS activity_domain_clusters CASCADE;
DROP TABLE IF EXISTS activity_domains CASCADE;
DROP TABLE IF EXISTS user_groups CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS organization_clusters CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
DROP TABLE IF EXISTS cluster_countries CASCADE;
DROP TABLE IF EXISTS clusters CASCADE;
DROP TABLE IF EXISTS locations CASCADE;

DROP FUNCTION IF EXISTS touch_updated_at();

DROP TYPE IF EXISTS beneficiary_status CASCADE;
DROP TYPE IF EXISTS report_state CASCADE;
DROP TYPE IF EXISTS project_state CASCADE;
";
