//! Bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Organization the user belongs to.
    pub org: Uuid,
    /// Group names, e.g. `HEALTH_CLUSTER_LEADS`.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Superusers bypass every permission check.
    #[serde(default)]
    pub is_superuser: bool,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        org_id: Uuid,
        groups: Vec<String>,
        is_superuser: bool,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            org: org_id,
            groups,
            is_superuser,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the organization ID from claims.
    #[must_use]
    pub const fn organization_id(&self) -> Uuid {
        self.org
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_fields() {
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::minutes(30);
        let claims = Claims::new(
            user,
            org,
            vec!["HEALTH_CLUSTER_LEADS".to_string()],
            false,
            expires_at,
        );

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.organization_id(), org);
        assert_eq!(claims.groups, vec!["HEALTH_CLUSTER_LEADS"]);
        assert!(!claims.is_superuser);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_without_groups_deserialize() {
        let json = serde_json::json!({
            "sub": Uuid::nil(),
            "org": Uuid::nil(),
            "iat": 0,
            "exp": 10,
        });
        let claims: Claims = serde_json::from_value(json).unwrap();
        assert!(claims.groups.is_empty());
        assert!(!claims.is_superuser);
    }
}
