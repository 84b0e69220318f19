use serde::{Deserialize, Serialize};

use cin_core::OrgId;

use crate::{Privilege, PrivilegeType};

/// A caller's membership in an organization.
///
/// This is the privilege scoping boundary: privileges listed here only apply
/// while this organization is the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub organization_id: OrgId,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub privileges: Vec<Privilege>,
}

impl OrganizationMembership {
    pub fn new(organization_id: OrgId, organization_name: impl Into<String>) -> Self {
        Self {
            organization_id,
            organization_name: organization_name.into(),
            privileges: Vec::new(),
        }
    }

    pub fn with_privilege(mut self, privilege: Privilege) -> Self {
        self.privileges.push(privilege);
        self
    }

    /// Approved privilege types held by this organization.
    pub fn approved_privileges(&self) -> impl Iterator<Item = &PrivilegeType> {
        self.privileges
            .iter()
            .filter(|p| p.is_effective())
            .map(|p| &p.kind)
    }
}
