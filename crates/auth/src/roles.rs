use serde::{Deserialize, Serialize};

use cin_core::OrgId;

/// Administrative role carried in a session.
///
/// `Admin` is the historical undifferentiated sentinel: route policy that asks
/// for `Admin` accepts any administrator, while `CinAdmin` and `OrgAdmin` only
/// accept themselves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    CinAdmin,
    OrgAdmin,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CinAdmin => "cin_admin",
            Role::OrgAdmin => "org_admin",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cin_admin" => Some(Role::CinAdmin),
            "org_admin" => Some(Role::OrgAdmin),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether holding `self` satisfies a route that requires `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Admin => true,
            other => *self == other,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    Global,
    Organization,
}

/// A role granted to the caller, either platform-wide or within one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub scope: RoleScope,
    pub organization_id: Option<OrgId>,
}

impl RoleAssignment {
    pub fn global(role: Role) -> Self {
        Self {
            role,
            scope: RoleScope::Global,
            organization_id: None,
        }
    }

    pub fn organization(role: Role, organization_id: Option<OrgId>) -> Self {
        Self {
            role,
            scope: RoleScope::Organization,
            organization_id,
        }
    }

    /// Whether this assignment is in force while `active` is the selected organization.
    ///
    /// Organization-scoped assignments that name an organization only apply
    /// inside that organization.
    pub fn applies_to(&self, active: Option<&OrgId>) -> bool {
        match (self.scope, &self.organization_id) {
            (RoleScope::Global, _) => true,
            (RoleScope::Organization, None) => true,
            (RoleScope::Organization, Some(org)) => active == Some(org),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str) -> OrgId {
        OrgId::new(id).unwrap()
    }

    #[test]
    fn admin_requirement_accepts_every_administrator() {
        for role in [Role::CinAdmin, Role::OrgAdmin, Role::Admin] {
            assert!(role.satisfies(Role::Admin), "{role} should satisfy admin");
        }
    }

    #[test]
    fn specific_requirements_only_accept_themselves() {
        assert!(Role::CinAdmin.satisfies(Role::CinAdmin));
        assert!(!Role::OrgAdmin.satisfies(Role::CinAdmin));
        assert!(!Role::Admin.satisfies(Role::CinAdmin));
        assert!(!Role::CinAdmin.satisfies(Role::OrgAdmin));
    }

    #[test]
    fn parse_round_trips_known_names() {
        for role in [Role::CinAdmin, Role::OrgAdmin, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn organization_scoped_assignment_follows_active_organization() {
        let a = RoleAssignment::organization(Role::OrgAdmin, Some(org("O1")));
        assert!(a.applies_to(Some(&org("O1"))));
        assert!(!a.applies_to(Some(&org("O2"))));
        assert!(!a.applies_to(None));

        let unscoped = RoleAssignment::organization(Role::Admin, None);
        assert!(unscoped.applies_to(None));

        let global = RoleAssignment::global(Role::CinAdmin);
        assert!(global.applies_to(Some(&org("O2"))));
    }
}
