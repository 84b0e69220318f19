use serde::Serialize;

use cin_core::OrgId;

use crate::paths::{self, DASHBOARD};
use crate::resolver::{self, active_organization, effective_privileges, effective_roles};
use crate::{Claims, PrivilegeType, Role, RoutePermission, RouteTable};

/// Why a caller was sent away. Rendered by the UI as an explanatory banner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    InsufficientRole,
    InsufficientPrivileges,
    NoAdminRole,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::InsufficientRole => "insufficient_role",
            ReasonCode::InsufficientPrivileges => "insufficient_privileges",
            ReasonCode::NoAdminRole => "no_admin_role",
        }
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing detail attached to a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub reason: Option<ReasonCode>,
    pub required_roles: Vec<Role>,
    pub required_privileges: Vec<PrivilegeType>,
}

impl Diagnostics {
    fn reason(reason: ReasonCode) -> Self {
        Self {
            reason: Some(reason),
            ..Self::default()
        }
    }

    fn for_route(reason: ReasonCode, route: &RoutePermission) -> Self {
        Self {
            reason: Some(reason),
            required_roles: route.required_roles.iter().copied().collect(),
            required_privileges: route.required_privileges.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub target: &'static str,
    #[serde(flatten)]
    pub diagnostics: Diagnostics,
}

impl Redirect {
    fn to_dashboard(diagnostics: Diagnostics) -> Self {
        Self {
            target: DASHBOARD,
            diagnostics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Allow,
    RedirectTo(Redirect),
    DenyAsUnauthenticated,
}

impl AuthorizationDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            AuthorizationDecision::RedirectTo(r) => r.diagnostics.reason,
            _ => None,
        }
    }
}

/// Decide a request against the product route table.
pub fn decide(claims: Option<&Claims>, path: &str) -> AuthorizationDecision {
    decide_with(RouteTable::product(), claims, path)
}

/// Decide a request against `table`.
///
/// - No IO
/// - No panics
/// - Total: every `(claims, path)` pair yields exactly one decision
///
/// The role requirement is checked before the privilege requirement, so a
/// role failure is never reported as a privilege failure.
pub fn decide_with(table: &RouteTable, claims: Option<&Claims>, path: &str) -> AuthorizationDecision {
    let path = paths::normalize(path);
    let path = &*path;
    let public = paths::is_public(path);

    let Some(claims) = claims else {
        return if public {
            AuthorizationDecision::Allow
        } else {
            AuthorizationDecision::DenyAsUnauthenticated
        };
    };

    if !resolver::has_base_access(claims) {
        return if public {
            AuthorizationDecision::Allow
        } else {
            AuthorizationDecision::RedirectTo(Redirect::to_dashboard(Diagnostics::reason(
                ReasonCode::NoAdminRole,
            )))
        };
    }

    // Signed-in administrators never see the entry page or the login forms.
    if path == paths::ROOT || paths::is_auth_page(path) {
        return AuthorizationDecision::RedirectTo(Redirect::to_dashboard(Diagnostics::default()));
    }

    let Some(route) = table.lookup(path) else {
        return AuthorizationDecision::Allow;
    };

    if !route.required_roles.is_empty() {
        let roles = effective_roles(claims);
        let role_ok = route
            .required_roles
            .iter()
            .any(|required| roles.iter().any(|held| held.satisfies(*required)));
        if !role_ok {
            return AuthorizationDecision::RedirectTo(Redirect::to_dashboard(
                Diagnostics::for_route(ReasonCode::InsufficientRole, route),
            ));
        }
    }

    if !route.required_privileges.is_empty() {
        let held = effective_privileges(claims);
        if !route.required_privileges.is_subset(&held) {
            return AuthorizationDecision::RedirectTo(Redirect::to_dashboard(
                Diagnostics::for_route(ReasonCode::InsufficientPrivileges, route),
            ));
        }
    }

    AuthorizationDecision::Allow
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this path allowed/redirected?" for support tooling and
/// audit logs. Never contains the raw token.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionExplanation {
    pub path: String,
    pub decision: AuthorizationDecision,
    pub authenticated: bool,
    pub has_base_access: bool,
    pub active_organization_id: Option<OrgId>,
    /// Present when the active organization could not be resolved.
    pub active_organization_error: Option<String>,
    pub effective_roles: Vec<Role>,
    pub effective_privileges: Vec<PrivilegeType>,
    /// The table entry consulted, if any.
    pub route: Option<RoutePermission>,
    pub summary: String,
}

pub fn explain(claims: Option<&Claims>, path: &str) -> DecisionExplanation {
    explain_with(RouteTable::product(), claims, path)
}

pub fn explain_with(table: &RouteTable, claims: Option<&Claims>, path: &str) -> DecisionExplanation {
    let normalized = paths::normalize(path);
    let normalized = &*normalized;
    let decision = decide_with(table, claims, normalized);
    let route = table.lookup(normalized).cloned();

    let (active_organization_id, active_organization_error) = match claims.map(active_organization) {
        Some(Ok(m)) => (Some(m.organization_id.clone()), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, None),
    };

    let summary = match &decision {
        AuthorizationDecision::Allow if route.is_some() => {
            format!("'{normalized}' allowed: role and privilege requirements met")
        }
        AuthorizationDecision::Allow if paths::is_public(normalized) => {
            format!("'{normalized}' is public")
        }
        AuthorizationDecision::Allow => {
            format!("'{normalized}' has no table entry; administrators may open it")
        }
        AuthorizationDecision::DenyAsUnauthenticated => {
            format!("'{normalized}' requires a session; none was presented")
        }
        AuthorizationDecision::RedirectTo(r) => match r.diagnostics.reason {
            None => format!("signed-in administrators are sent from '{normalized}' to '{}'", r.target),
            Some(ReasonCode::NoAdminRole) => {
                "caller holds no administrator role (organization may be pending approval)".to_string()
            }
            Some(ReasonCode::InsufficientRole) => format!(
                "'{normalized}' requires one of {:?}",
                r.diagnostics.required_roles.iter().map(Role::as_str).collect::<Vec<_>>()
            ),
            Some(ReasonCode::InsufficientPrivileges) => format!(
                "'{normalized}' requires all approved privileges {:?} in the active organization",
                r.diagnostics
                    .required_privileges
                    .iter()
                    .map(PrivilegeType::as_str)
                    .collect::<Vec<_>>()
            ),
        },
    };

    DecisionExplanation {
        path: normalized.to_string(),
        decision,
        authenticated: claims.is_some(),
        has_base_access: claims.is_some_and(resolver::has_base_access),
        active_organization_id,
        active_organization_error,
        effective_roles: claims
            .map(|c| effective_roles(c).into_iter().collect())
            .unwrap_or_default(),
        effective_privileges: claims
            .map(|c| effective_privileges(c).into_iter().collect())
            .unwrap_or_default(),
        route,
        summary,
    }
}
