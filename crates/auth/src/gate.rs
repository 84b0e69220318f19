//! Request gate: raw session token + path in, response action out.
//!
//! Transport-agnostic; `cin-api` maps [`ResponseAction`] onto HTTP.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::form_urlencoded;

use crate::authorize::{AuthorizationDecision, Diagnostics, decide_with};
use crate::claims::validate_claims;
use crate::decoder::decode;
use crate::paths;
use crate::resolver::{ResolveError, active_organization, effective_privileges, effective_roles};
use crate::{Claims, PrivilegeType, Role, RouteTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Where callers without a usable session are sent.
    pub sign_in_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            sign_in_path: paths::SIGN_IN.to_string(),
        }
    }
}

/// What downstream handlers learn about an allowed caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub claims: Claims,
    pub roles: Vec<Role>,
    pub privileges: Vec<PrivilegeType>,
}

impl Session {
    fn from_claims(claims: Claims) -> Self {
        let roles = effective_roles(&claims).into_iter().collect();
        let privileges = effective_privileges(&claims).into_iter().collect();
        Self {
            claims,
            roles,
            privileges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAction {
    /// Let the request through. `notice` is set when the caller was meant to be
    /// redirected to the page they are already on.
    Continue {
        session: Option<Session>,
        notice: Option<Diagnostics>,
    },
    Redirect {
        location: String,
    },
    Unauthenticated {
        location: String,
    },
}

#[derive(Debug, Clone)]
pub struct Gate {
    config: GateConfig,
    table: Arc<RouteTable>,
}

impl Gate {
    /// Gate over the product route table.
    pub fn new(config: GateConfig) -> Self {
        Self::with_table(config, RouteTable::product().clone())
    }

    pub fn with_table(config: GateConfig, table: RouteTable) -> Self {
        Self {
            config,
            table: Arc::new(table),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn handle(&self, raw_token: Option<&str>, path: &str) -> ResponseAction {
        self.handle_at(raw_token, path, Utc::now())
    }

    /// Never fails: anything unexpected ends as [`ResponseAction::Unauthenticated`].
    pub fn handle_at(&self, raw_token: Option<&str>, path: &str, now: DateTime<Utc>) -> ResponseAction {
        let path = paths::normalize(path);
        let path = &*path;
        match std::panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(raw_token, path, now))) {
            Ok(action) => action,
            Err(_) => {
                tracing::error!(path, "authorization evaluation panicked; treating request as unauthenticated");
                self.unauthenticated()
            }
        }
    }

    /// Decoded and time-valid claims, or `None` (the fail-closed case).
    pub fn claims_from(&self, raw_token: &str, now: DateTime<Utc>) -> Option<Claims> {
        let token = raw_token.trim();
        if token.is_empty() {
            return None;
        }

        let claims = match decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting session token");
                return None;
            }
        };

        if let Err(e) = validate_claims(&claims, now) {
            tracing::warn!(error = %e, subject = ?claims.subject, "rejecting stale session");
            return None;
        }

        Some(claims)
    }

    fn evaluate(&self, raw_token: Option<&str>, path: &str, now: DateTime<Utc>) -> ResponseAction {
        let claims = raw_token.and_then(|t| self.claims_from(t, now));
        if let Some(Err(err @ ResolveError::MissingActiveOrganization(_))) =
            claims.as_ref().map(active_organization)
        {
            let subject = claims.as_ref().and_then(|c| c.subject.as_deref());
            tracing::warn!(error = %err, subject = ?subject, "failing closed to an empty privilege set");
        }
        let decision = decide_with(&self.table, claims.as_ref(), path);

        tracing::debug!(
            path,
            authenticated = claims.is_some(),
            decision = ?decision,
            "authorization decision"
        );

        match decision {
            AuthorizationDecision::Allow => ResponseAction::Continue {
                session: claims.map(Session::from_claims),
                notice: None,
            },
            AuthorizationDecision::RedirectTo(redirect) if redirect.target == path => {
                ResponseAction::Continue {
                    session: claims.map(Session::from_claims),
                    notice: Some(redirect.diagnostics),
                }
            }
            AuthorizationDecision::RedirectTo(redirect) => ResponseAction::Redirect {
                location: redirect_location(redirect.target, &redirect.diagnostics),
            },
            AuthorizationDecision::DenyAsUnauthenticated => self.unauthenticated(),
        }
    }

    fn unauthenticated(&self) -> ResponseAction {
        ResponseAction::Unauthenticated {
            location: self.config.sign_in_path.clone(),
        }
    }
}

/// `target` plus `error`, `required_role` and `required_privileges` query parameters.
pub fn redirect_location(target: &str, diagnostics: &Diagnostics) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(reason) = diagnostics.reason {
        query.append_pair("error", reason.as_str());
    }
    if !diagnostics.required_roles.is_empty() {
        let roles: Vec<&str> = diagnostics.required_roles.iter().map(Role::as_str).collect();
        query.append_pair("required_role", &roles.join(","));
    }
    if !diagnostics.required_privileges.is_empty() {
        let privileges: Vec<&str> = diagnostics
            .required_privileges
            .iter()
            .map(PrivilegeType::as_str)
            .collect();
        query.append_pair("required_privileges", &privileges.join(","));
    }

    let query = query.finish();
    if query.is_empty() {
        target.to_string()
    } else {
        format!("{target}?{query}")
    }
}
