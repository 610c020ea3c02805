//! Who may do what.

use reporthub_shared::Claims;
use reporthub_shared::types::{OrganizationId, UserId};

use crate::access::error::AccessError;

/// Group name for the leads of a cluster, e.g. `WASH_CLUSTER_LEADS`.
#[must_use]
pub fn cluster_lead_group(cluster_code: &str) -> String {
    format!("{}_CLUSTER_LEADS", cluster_code.trim().to_uppercase())
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User id.
    pub user_id: UserId,
    /// The user's organization.
    pub organization_id: OrganizationId,
    /// Group names.
    pub groups: Vec<String>,
    /// Superusers bypass every check.
    pub is_superuser: bool,
}

impl Actor {
    /// Builds the actor from validated token claims.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: UserId::from_uuid(claims.sub),
            organization_id: OrganizationId::from_uuid(claims.org),
            groups: claims.groups.clone(),
            is_superuser: claims.is_superuser,
        }
    }

    /// Returns true if the actor leads at least one of the given clusters.
    #[must_use]
    pub fn is_cluster_lead<S: AsRef<str>>(&self, cluster_codes: &[S]) -> bool {
        cluster_codes.iter().any(|code| {
            let group = cluster_lead_group(code.as_ref());
            self.groups.iter().any(|g| g.eq_ignore_ascii_case(&group))
        })
    }

    /// Codes of the clusters the actor leads.
    #[must_use]
    pub fn led_clusters(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter_map(|g| {
                let upper = g.to_uppercase();
                upper
                    .strip_suffix("_CLUSTER_LEADS")
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
            })
            .collect()
    }
}

/// Ownership data of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScope {
    /// User who created the project.
    pub owner_id: Option<UserId>,
    /// Organization running the project.
    pub organization_id: OrganizationId,
    /// Codes of the project's clusters.
    pub cluster_codes: Vec<String>,
}

/// Stateless permission checks.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Project members and cluster leads may edit a project and its reports.
    pub fn ensure_can_edit_project(actor: &Actor, scope: &ProjectScope) -> Result<(), AccessError> {
        if actor.is_superuser
            || scope.owner_id == Some(actor.user_id)
            || actor.organization_id == scope.organization_id
            || actor.is_cluster_lead(&scope.cluster_codes)
        {
            Ok(())
        } else {
            Err(AccessError::NotProjectEditor)
        }
    }

    /// Approving and rejecting reports is reserved for cluster leads.
    pub fn ensure_can_review(actor: &Actor, scope: &ProjectScope) -> Result<(), AccessError> {
        if actor.is_superuser || actor.is_cluster_lead(&scope.cluster_codes) {
            Ok(())
        } else {
            Err(AccessError::NotClusterLead)
        }
    }

    /// Locations and other reference data.
    pub fn ensure_superuser(actor: &Actor) -> Result<(), AccessError> {
        if actor.is_superuser {
            Ok(())
        } else {
            Err(AccessError::SuperuserRequired)
        }
    }

    /// Cluster dashboards are visible to the cluster's leads.
    pub fn ensure_cluster_lead(actor: &Actor, cluster_code: &str) -> Result<(), AccessError> {
        if actor.is_superuser || actor.is_cluster_lead(&[cluster_code]) {
            Ok(())
        } else {
            Err(AccessError::DashboardDenied)
        }
    }

    /// Organization dashboards are visible to members and to leads of
    /// one of the organization's clusters.
    pub fn ensure_can_view_org_dashboard<S: AsRef<str>>(
        actor: &Actor,
        organization_id: OrganizationId,
        org_cluster_codes: &[S],
    ) -> Result<(), AccessError> {
        if actor.is_superuser
            || actor.organization_id == organization_id
            || actor.is_cluster_lead(org_cluster_codes)
        {
            Ok(())
        } else {
            Err(AccessError::DashboardDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(groups: &[&str]) -> Actor {
        Actor {
            user_id: UserId::new(),
            organization_id: OrganizationId::new(),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
            is_superuser: false,
        }
    }

    fn scope() -> ProjectScope {
        ProjectScope {
            owner_id: Some(UserId::new()),
            organization_id: OrganizationId::new(),
            cluster_codes: vec!["wash".into(), "fsac".into()],
        }
    }

    #[test]
    fn test_group_name() {
        assert_eq!(cluster_lead_group("wash"), "WASH_CLUSTER_LEADS");
    }

    #[test]
    fn test_led_clusters() {
        let lead = actor(&["WASH_CLUSTER_LEADS", "editors", "_CLUSTER_LEADS"]);
        assert_eq!(lead.led_clusters(), vec!["WASH".to_string()]);
    }

    #[test]
    fn test_edit_project() {
        let scope = scope();
        let outsider = actor(&[]);
        assert_eq!(
            AccessPolicy::ensure_can_edit_project(&outsider, &scope),
            Err(AccessError::NotProjectEditor)
        );

        let member = Actor {
            organization_id: scope.organization_id,
            ..actor(&[])
        };
        assert!(AccessPolicy::ensure_can_edit_project(&member, &scope).is_ok());

        let lead = actor(&["FSAC_CLUSTER_LEADS"]);
        assert!(AccessPolicy::ensure_can_edit_project(&lead, &scope).is_ok());
    }

    #[test]
    fn test_review_needs_cluster_lead() {
        let scope = scope();
        let member = Actor {
            organization_id: scope.organization_id,
            ..actor(&[])
        };
        assert_eq!(
            AccessPolicy::ensure_can_review(&member, &scope),
            Err(AccessError::NotClusterLead)
        );
        assert!(AccessPolicy::ensure_can_review(&actor(&["WASH_CLUSTER_LEADS"]), &scope).is_ok());

        let admin = Actor {
            is_superuser: true,
            ..actor(&[])
        };
        assert!(AccessPolicy::ensure_can_review(&admin, &scope).is_ok());
        assert!(AccessPolicy::ensure_superuser(&admin).is_ok());
        assert_eq!(
            AccessPolicy::ensure_superuser(&member),
            Err(AccessError::SuperuserRequired)
        );
    }

    #[test]
    fn test_dashboards() {
        let lead = actor(&["WASH_CLUSTER_LEADS"]);
        assert!(AccessPolicy::ensure_cluster_lead(&lead, "wash").is_ok());
        assert!(AccessPolicy::ensure_cluster_lead(&lead, "fsac").is_err());

        let org = OrganizationId::new();
        assert!(AccessPolicy::ensure_can_view_org_dashboard(&lead, org, &["WASH"]).is_ok());
        assert!(AccessPolicy::ensure_can_view_org_dashboard(&lead, org, &["FSAC"]).is_err());
        let member = Actor {
            organization_id: org,
            ..actor(&[])
        };
        let none: [&str; 0] = [];
        assert!(AccessPolicy::ensure_can_view_org_dashboard(&member, org, &none).is_ok());
    }
}
