//! Lookup tables used while resolving import rows.
//!
//! Keys are compared case-insensitively after trimming. An alias, when one
//! is registered, takes precedence over the entity's own code or name.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reporthub_shared::types::{ActivityPlanId, DisaggregationId, LocationId, TargetLocationId};

use crate::location::{AdminLevel, LocationNode};

/// Entity kinds that can carry import aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    /// Matched by indicator name.
    Indicator,
    /// Matched by activity domain code.
    ActivityDomain,
    /// Matched by activity type code.
    ActivityType,
    /// Matched by activity detail code.
    ActivityDetail,
    /// Matched by location pcode.
    Location,
    /// Matched by location type name.
    LocationType,
    /// Matched by facility site type name.
    FacilitySiteType,
    /// Matched by beneficiary type name.
    BeneficiaryType,
    /// Matched by organization code.
    Organization,
}

impl AliasKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indicator => "indicator",
            Self::ActivityDomain => "activity_domain",
            Self::ActivityType => "activity_type",
            Self::ActivityDetail => "activity_detail",
            Self::Location => "location",
            Self::LocationType => "location_type",
            Self::FacilitySiteType => "facility_site_type",
            Self::BeneficiaryType => "beneficiary_type",
            Self::Organization => "organization",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "indicator" => Some(Self::Indicator),
            "activity_domain" => Some(Self::ActivityDomain),
            "activity_type" => Some(Self::ActivityType),
            "activity_detail" => Some(Self::ActivityDetail),
            "location" => Some(Self::Location),
            "location_type" => Some(Self::LocationType),
            "facility_site_type" => Some(Self::FacilitySiteType),
            "beneficiary_type" => Some(Self::BeneficiaryType),
            "organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

impl fmt::Display for AliasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An activity type and the domain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTypeRef {
    /// Activity type id.
    pub id: Uuid,
    /// Parent activity domain.
    pub activity_domain_id: Uuid,
    /// Display name.
    pub name: String,
}

/// An indicator and the activity types it measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRef {
    /// Indicator id.
    pub id: Uuid,
    /// Activity types the indicator is attached to.
    pub activity_type_ids: Vec<Uuid>,
    /// Display name.
    pub name: String,
}

/// Identity of an activity plan within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey {
    /// Activity domain.
    pub activity_domain_id: Uuid,
    /// Activity type.
    pub activity_type_id: Uuid,
    /// Activity detail, when the plan has one.
    pub activity_detail_id: Option<Uuid>,
    /// Indicator.
    pub indicator_id: Uuid,
}

/// A planned activity of the project being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPlanRef {
    /// Activity plan id.
    pub id: ActivityPlanId,
    /// What the plan is about.
    pub key: PlanKey,
}

/// A planned target location of the project being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLocationRef {
    /// Target location id.
    pub id: TargetLocationId,
    /// Parent activity plan.
    pub activity_plan_id: ActivityPlanId,
    /// Country.
    pub country_id: LocationId,
    /// Province.
    pub province_id: LocationId,
    /// District.
    pub district_id: LocationId,
    /// Zone.
    pub zone_id: Option<LocationId>,
}

#[derive(Debug, Clone)]
struct Lookup<T> {
    by_id: HashMap<Uuid, T>,
    by_key: HashMap<String, Uuid>,
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<T> Lookup<T> {
    fn insert(&mut self, key: &str, id: Uuid, value: T) {
        self.by_key.insert(normalize(key), id);
        self.by_id.insert(id, value);
    }

    fn find(&self, aliases: &HashMap<(AliasKind, String), Uuid>, kind: AliasKind, raw: &str) -> Option<&T> {
        let key = normalize(raw);
        aliases
            .get(&(kind, key.clone()))
            .and_then(|id| self.by_id.get(id))
            .or_else(|| self.by_key.get(&key).and_then(|id| self.by_id.get(id)))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Reference data preloaded for one import.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    aliases: HashMap<(AliasKind, String), Uuid>,
    indicators: Lookup<IndicatorRef>,
    activity_domains: Lookup<String>,
    activity_types: Lookup<ActivityTypeRef>,
    activity_details: Lookup<Uuid>,
    locations: Lookup<LocationNode>,
    location_types: Lookup<Uuid>,
    facility_site_types: Lookup<Uuid>,
    beneficiary_types: Lookup<Uuid>,
    organizations: Lookup<Uuid>,
}

impl ReferenceIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an alias.
    pub fn add_alias(&mut self, kind: AliasKind, alias: &str, entity_id: Uuid) {
        self.aliases.insert((kind, normalize(alias)), entity_id);
    }

    /// Registers an indicator under its name.
    pub fn add_indicator(&mut self, indicator: IndicatorRef) {
        let name = indicator.name.clone();
        self.indicators.insert(&name, indicator.id, indicator);
    }

    /// Registers an activity domain under its code.
    pub fn add_activity_domain(&mut self, id: Uuid, code: &str, name: &str) {
        self.activity_domains.insert(code, id, name.to_string());
    }

    /// Registers an activity type under its code.
    pub fn add_activity_type(&mut self, code: &str, activity_type: ActivityTypeRef) {
        self.activity_types.insert(code, activity_type.id, activity_type);
    }

    /// Registers an activity detail under its code.
    pub fn add_activity_detail(&mut self, id: Uuid, code: &str) {
        self.activity_details.insert(code, id, id);
    }

    /// Registers a location under its pcode.
    pub fn add_location(&mut self, node: LocationNode) {
        let code = node.code.clone();
        self.locations.insert(&code, node.id.into_inner(), node);
    }

    /// Registers a location type under its name.
    pub fn add_location_type(&mut self, id: Uuid, name: &str) {
        self.location_types.insert(name, id, id);
    }

    /// Registers a facility site type under its name.
    pub fn add_facility_site_type(&mut self, id: Uuid, name: &str) {
        self.facility_site_types.insert(name, id, id);
    }

    /// Registers a beneficiary type under its name.
    pub fn add_beneficiary_type(&mut self, id: Uuid, name: &str) {
        self.beneficiary_types.insert(name, id, id);
    }

    /// Registers an organization under its code.
    pub fn add_organization(&mut self, id: Uuid, code: &str) {
        self.organizations.insert(code, id, id);
    }

    /// Indicator by name or alias.
    #[must_use]
    pub fn indicator(&self, raw: &str) -> Option<&IndicatorRef> {
        self.indicators.find(&self.aliases, AliasKind::Indicator, raw)
    }

    /// Activity domain id and name by code or alias.
    #[must_use]
    pub fn activity_domain(&self, raw: &str) -> Option<(Uuid, &str)> {
        let key = normalize(raw);
        let id = self
            .aliases
            .get(&(AliasKind::ActivityDomain, key.clone()))
            .filter(|id| self.activity_domains.by_id.contains_key(id))
            .or_else(|| self.activity_domains.by_key.get(&key))?;
        self.activity_domains
            .by_id
            .get(id)
            .map(|name| (*id, name.as_str()))
    }

    /// Activity type by code or alias.
    #[must_use]
    pub fn activity_type(&self, raw: &str) -> Option<&ActivityTypeRef> {
        self.activity_types.find(&self.aliases, AliasKind::ActivityType, raw)
    }

    /// Activity detail id by code or alias.
    #[must_use]
    pub fn activity_detail(&self, raw: &str) -> Option<Uuid> {
        self.activity_details
            .find(&self.aliases, AliasKind::ActivityDetail, raw)
            .copied()
    }

    /// Location by pcode or alias, if it sits at `level` under `parent`.
    #[must_use]
    pub fn location_at(
        &self,
        raw: &str,
        level: AdminLevel,
        parent: Option<&LocationNode>,
    ) -> Option<&LocationNode> {
        self.locations
            .find(&self.aliases, AliasKind::Location, raw)
            .filter(|node| node.level == level && node.parent_id == parent.map(|p| p.id))
    }

    /// Location type id by name or alias.
    #[must_use]
    pub fn location_type(&self, raw: &str) -> Option<Uuid> {
        self.location_types
            .find(&self.aliases, AliasKind::LocationType, raw)
            .copied()
    }

    /// Facility site type id by name or alias.
    #[must_use]
    pub fn facility_site_type(&self, raw: &str) -> Option<Uuid> {
        self.facility_site_types
            .find(&self.aliases, AliasKind::FacilitySiteType, raw)
            .copied()
    }

    /// Beneficiary type id by name or alias.
    #[must_use]
    pub fn beneficiary_type(&self, raw: &str) -> Option<Uuid> {
        self.beneficiary_types
            .find(&self.aliases, AliasKind::BeneficiaryType, raw)
            .copied()
    }

    /// Organization id by code or alias.
    #[must_use]
    pub fn organization(&self, raw: &str) -> Option<Uuid> {
        self.organizations
            .find(&self.aliases, AliasKind::Organization, raw)
            .copied()
    }
}

/// A resolved country / province / district / zone chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocations {
    /// Country.
    pub country_id: LocationId,
    /// Province.
    pub province_id: LocationId,
    /// District.
    pub district_id: LocationId,
    /// Zone.
    pub zone_id: Option<LocationId>,
}

/// Disaggregation column of an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisaggregationColumn {
    /// Disaggregation id.
    pub id: DisaggregationId,
    /// Column header, the disaggregation name.
    pub name: String,
}
