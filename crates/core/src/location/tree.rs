//! Location levels, nodes and hierarchy checks.

use serde::{Deserialize, Serialize};
use std::fmt;

use reporthub_shared::types::LocationId;

use crate::location::error::LocationError;

/// Administrative level of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevel {
    /// Level 0.
    Country,
    /// Level 1.
    Province,
    /// Level 2.
    District,
    /// Level 3.
    Zone,
}

impl AdminLevel {
    /// Numeric level as stored in the database.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Country => 0,
            Self::Province => 1,
            Self::District => 2,
            Self::Zone => 3,
        }
    }

    /// Parses a stored numeric level.
    pub fn from_i16(level: i16) -> Result<Self, LocationError> {
        match level {
            0 => Ok(Self::Country),
            1 => Ok(Self::Province),
            2 => Ok(Self::District),
            3 => Ok(Self::Zone),
            other => Err(LocationError::InvalidLevel(other)),
        }
    }

    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Province => "province",
            Self::District => "district",
            Self::Zone => "zone",
        }
    }

    /// Level a parent of this level must have, `None` for countries.
    #[must_use]
    pub const fn parent_level(self) -> Option<Self> {
        match self {
            Self::Country => None,
            Self::Province => Some(Self::Country),
            Self::District => Some(Self::Province),
            Self::Zone => Some(Self::District),
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A location as seen by the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    /// Location ID.
    pub id: LocationId,
    /// Parent location, `None` for countries.
    pub parent_id: Option<LocationId>,
    /// Administrative level.
    pub level: AdminLevel,
    /// Unique pcode.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Country → province → district (→ zone) chain referenced by a target location.
#[derive(Debug, Clone, Copy)]
pub struct LocationPath<'a> {
    /// Country node.
    pub country: &'a LocationNode,
    /// Province node.
    pub province: &'a LocationNode,
    /// District node.
    pub district: &'a LocationNode,
    /// Optional zone node.
    pub zone: Option<&'a LocationNode>,
}

/// Stateless checks over the location tree.
pub struct LocationService;

impl LocationService {
    /// Validates where a new location may be inserted.
    ///
    /// Returns the parsed level when `level` and `parent` are consistent.
    pub fn validate_placement(
        level: i16,
        parent: Option<&LocationNode>,
    ) -> Result<AdminLevel, LocationError> {
        let level = AdminLevel::from_i16(level)?;

        match (level.parent_level(), parent) {
            (None, None) => Ok(level),
            (None, Some(_)) => Err(LocationError::CountryWithParent),
            (Some(_), None) => Err(LocationError::MissingParent { level }),
            (Some(expected), Some(parent)) if parent.level == expected => Ok(level),
            (Some(expected), Some(parent)) => Err(LocationError::ParentLevelMismatch {
                level,
                expected,
                actual: parent.level,
            }),
        }
    }

    /// Checks that every node of a path sits directly under the previous one.
    pub fn validate_path(path: &LocationPath<'_>) -> Result<(), LocationError> {
        Self::expect_child(path.country, None, AdminLevel::Country)?;
        Self::expect_child(path.province, Some(path.country), AdminLevel::Province)?;
        Self::expect_child(path.district, Some(path.province), AdminLevel::District)?;
        if let Some(zone) = path.zone {
            Self::expect_child(zone, Some(path.district), AdminLevel::Zone)?;
        }
        Ok(())
    }

    fn expect_child(
        node: &LocationNode,
        parent: Option<&LocationNode>,
        level: AdminLevel,
    ) -> Result<(), LocationError> {
        if node.level != level {
            return Err(LocationError::WrongLevel {
                code: node.code.clone(),
                expected: level,
                actual: node.level,
            });
        }
        match parent {
            Some(parent) if node.parent_id != Some(parent.id) => {
                Err(LocationError::OutsideParent {
                    level,
                    code: node.code.clone(),
                    parent_code: parent.code.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(level: AdminLevel, code: &str, parent: Option<&LocationNode>) -> LocationNode {
        LocationNode {
            id: LocationId::new(),
            parent_id: parent.map(|p| p.id),
            level,
            code: code.to_string(),
            name: code.to_string(),
        }
    }

    #[test]
    fn test_level_round_trip() {
        for raw in 0..=3 {
            assert_eq!(AdminLevel::from_i16(raw).unwrap().as_i16(), raw);
        }
        assert_eq!(AdminLevel::from_i16(4), Err(LocationError::InvalidLevel(4)));
        assert_eq!(AdminLevel::from_i16(-1), Err(LocationError::InvalidLevel(-1)));
    }

    #[test]
    fn test_country_must_not_have_parent() {
        let af = node(AdminLevel::Country, "AF", None);
        assert_eq!(
            LocationService::validate_placement(0, None),
            Ok(AdminLevel::Country)
        );
        assert_eq!(
            LocationService::validate_placement(0, Some(&af)),
            Err(LocationError::CountryWithParent)
        );
    }

    #[test]
    fn test_child_level_must_follow_parent() {
        let af = node(AdminLevel::Country, "AF", None);
        let kabul = node(AdminLevel::Province, "AF01", Some(&af));

        assert_eq!(
            LocationService::validate_placement(1, Some(&af)),
            Ok(AdminLevel::Province)
        );
        assert_eq!(
            LocationService::validate_placement(2, Some(&kabul)),
            Ok(AdminLevel::District)
        );
        assert_eq!(
            LocationService::validate_placement(2, Some(&af)),
            Err(LocationError::ParentLevelMismatch {
                level: AdminLevel::District,
                expected: AdminLevel::Province,
                actual: AdminLevel::Country,
            })
        );
        assert_eq!(
            LocationService::validate_placement(3, None),
            Err(LocationError::MissingParent {
                level: AdminLevel::Zone
            })
        );
    }

    #[test]
    fn test_path_accepts_consistent_chain() {
        let af = node(AdminLevel::Country, "AF", None);
        let kabul = node(AdminLevel::Province, "AF01", Some(&af));
        let paghman = node(AdminLevel::District, "AF0102", Some(&kabul));

        let path = LocationPath {
            country: &af,
            province: &kabul,
            district: &paghman,
            zone: None,
        };
        assert!(LocationService::validate_path(&path).is_ok());
    }

    #[test]
    fn test_path_rejects_wrong_level() {
        let af = node(AdminLevel::Country, "AF", None);
        let kabul = node(AdminLevel::Province, "AF01", Some(&af));

        let path = LocationPath {
            country: &af,
            province: &kabul,
            district: &kabul,
            zone: None,
        };
        assert_eq!(
            LocationService::validate_path(&path),
            Err(LocationError::WrongLevel {
                code: "AF01".to_string(),
                expected: AdminLevel::District,
                actual: AdminLevel::Province,
            })
        );
    }

    #[test]
    fn test_path_rejects_district_from_other_province() {
        let af = node(AdminLevel::Country, "AF", None);
        let kabul = node(AdminLevel::Province, "AF01", Some(&af));
        let herat = node(AdminLevel::Province, "AF32", Some(&af));
        let injil = node(AdminLevel::District, "AF3202", Some(&herat));

        let path = LocationPath {
            country: &af,
            province: &kabul,
            district: &injil,
            zone: None,
        };
        assert_eq!(
            LocationService::validate_path(&path),
            Err(LocationError::OutsideParent {
                level: AdminLevel::District,
                code: "AF3202".to_string(),
                parent_code: "AF01".to_string(),
            })
        );
    }
}
