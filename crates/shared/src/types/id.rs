//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents passing a `LocationId` where a `DisaggregationId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(OrganizationId, "Unique identifier for an organization.");
typed_id!(LocationId, "Unique identifier for a location (country to zone).");
typed_id!(ClusterId, "Unique identifier for a humanitarian cluster.");
typed_id!(IndicatorId, "Unique identifier for an indicator.");
typed_id!(DisaggregationId, "Unique identifier for a disaggregation category.");
typed_id!(ProjectId, "Unique identifier for a project.");
typed_id!(ActivityPlanId, "Unique identifier for an activity plan.");
typed_id!(TargetLocationId, "Unique identifier for a planned target location.");
typed_id!(MonthlyReportId, "Unique identifier for a project monthly report.");
typed_id!(
    ActivityPlanReportId,
    "Unique identifier for an activity plan report."
);
typed_id!(
    TargetLocationReportId,
    "Unique identifier for a target location report."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_uuid() {
        let raw = Uuid::new_v4();
        let id = LocationId::from(raw);
        assert_eq!(Uuid::from(id), raw);
        assert_eq!(id.into_inner(), raw);
    }

    #[test]
    fn test_parse_and_display() {
        let id = DisaggregationId::new();
        let parsed: DisaggregationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<ProjectId>().is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let raw = Uuid::nil();
        let json = serde_json::to_string(&MonthlyReportId::from_uuid(raw)).unwrap();
        assert_eq!(json, format!("\"{raw}\""));
    }
}
