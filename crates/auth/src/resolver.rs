//! Effective privilege and role resolution for the active organization.

use std::collections::BTreeSet;

use thiserror::Error;

use cin_core::OrgId;

use crate::{Claims, OrganizationMembership, PrivilegeType, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no active organization selected")]
    NoActiveOrganization,

    #[error("active organization '{0}' is not among the caller's memberships")]
    MissingActiveOrganization(OrgId),
}

/// Find the membership of the organization the caller currently acts for.
///
/// There is no fallback to another membership: a missing or dangling selection
/// is an error, and callers treat it as "no privileges".
pub fn active_organization(claims: &Claims) -> Result<&OrganizationMembership, ResolveError> {
    let id = claims
        .active_organization_id
        .as_ref()
        .ok_or(ResolveError::NoActiveOrganization)?;

    claims
        .organizations
        .iter()
        .find(|m| &m.organization_id == id)
        .ok_or_else(|| ResolveError::MissingActiveOrganization(id.clone()))
}

/// Approved privilege types of the active organization.
///
/// Empty when the active organization cannot be resolved. Silent: the gate
/// reports a dangling selection once per request.
pub fn effective_privileges(claims: &Claims) -> BTreeSet<PrivilegeType> {
    active_organization(claims)
        .map(|membership| membership.approved_privileges().cloned().collect())
        .unwrap_or_default()
}

/// Roles in force for the active organization.
///
/// Global assignments always count; organization-scoped ones count when they
/// name no organization or name the active one.
pub fn effective_roles(claims: &Claims) -> BTreeSet<Role> {
    let active = active_organization(claims).ok().map(|m| &m.organization_id);
    claims
        .roles
        .iter()
        .filter(|a| a.applies_to(active))
        .map(|a| a.role)
        .collect()
}

/// Whether the caller holds any administrator role at all (in any scope).
pub fn has_base_access(claims: &Claims) -> bool {
    claims.roles.iter().any(|a| a.role.satisfies(Role::Admin))
}
