//! Session token decoding (payload only).
//!
//! Signature verification happens at the identity provider's issuance/refresh
//! boundary. This module only turns the payload segment into [`Claims`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use cin_core::OrgId;

use crate::{Claims, OrganizationMembership, Role, RoleAssignment, RoleScope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed session token: {0}")]
    Malformed(String),
}

impl DecodeError {
    fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

#[derive(Debug, Deserialize)]
struct WireClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    iat: Option<f64>,
    #[serde(default)]
    exp: Option<f64>,
    #[serde(default)]
    active_organization_id: Option<String>,
    #[serde(default)]
    roles: Option<Vec<WireRoleAssignment>>,
    #[serde(default)]
    organizations: Option<Vec<OrganizationMembership>>,
}

#[derive(Debug, Deserialize)]
struct WireRoleAssignment {
    role: String,
    #[serde(default)]
    scope: Option<RoleScope>,
    #[serde(default)]
    organization_id: Option<OrgId>,
}

/// Decode the claims carried by a session token.
///
/// Pure: the same token always yields the same result.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(DecodeError::malformed("empty token segment"));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| DecodeError::malformed(format!("payload is not base64url: {e}")))?;

    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| DecodeError::malformed(format!("payload is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(DecodeError::malformed("payload is not a JSON object"));
    }

    let wire: WireClaims = serde_json::from_value(value)
        .map_err(|e| DecodeError::malformed(format!("unexpected claims shape: {e}")))?;

    into_claims(wire)
}

fn into_claims(wire: WireClaims) -> Result<Claims, DecodeError> {
    let active_organization_id = match wire.active_organization_id {
        Some(id) if !id.trim().is_empty() => {
            Some(OrgId::new(id).map_err(|e| DecodeError::malformed(e.to_string()))?)
        }
        _ => None,
    };

    let roles = wire
        .roles
        .unwrap_or_default()
        .into_iter()
        .filter_map(into_assignment)
        .collect();

    Ok(Claims {
        subject: wire.sub,
        issued_at: wire.iat.map(timestamp).transpose()?,
        expires_at: wire.exp.map(timestamp).transpose()?,
        active_organization_id,
        roles,
        organizations: wire.organizations.unwrap_or_default(),
    })
}

fn into_assignment(wire: WireRoleAssignment) -> Option<RoleAssignment> {
    let Some(role) = Role::parse(&wire.role) else {
        tracing::debug!(role = %wire.role, "ignoring unknown role in session claims");
        return None;
    };

    let scope = wire.scope.unwrap_or(if wire.organization_id.is_some() {
        RoleScope::Organization
    } else {
        RoleScope::Global
    });

    Some(RoleAssignment {
        role,
        scope,
        organization_id: wire.organization_id,
    })
}

fn timestamp(secs: f64) -> Result<DateTime<Utc>, DecodeError> {
    if !secs.is_finite() {
        return Err(DecodeError::malformed("timestamp is not finite"));
    }
    DateTime::from_timestamp(secs.trunc() as i64, 0)
        .ok_or_else(|| DecodeError::malformed("timestamp out of range"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{PrivilegeStatus, PrivilegeType};

    /// Builds an unsigned token around a JSON payload.
    pub(crate) fn token_for(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn decodes_full_claims() {
        let token = token_for(&serde_json::json!({
            "sub": "user-1",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "active_organization_id": "O1",
            "roles": [{"role": "admin", "scope": "organization"}],
            "organizations": [{
                "organization_id": "O1",
                "organization_name": "Green Org",
                "privileges": [
                    {"type": "mission_partners", "status": "approved"},
                    {"type": "reward_partners", "status": "pending"}
                ]
            }]
        }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("user-1"));
        assert_eq!(claims.active_organization_id, Some(OrgId::new("O1").unwrap()));
        assert_eq!(
            claims.roles,
            vec![RoleAssignment::organization(Role::Admin, None)]
        );
        assert_eq!(claims.organizations.len(), 1);
        let privileges = &claims.organizations[0].privileges;
        assert_eq!(privileges[0].kind, PrivilegeType::MISSION_PARTNERS);
        assert_eq!(privileges[1].status, PrivilegeStatus::Pending);
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_003_600);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let claims = decode(&token_for(&serde_json::json!({}))).unwrap();
        assert_eq!(claims, Claims::default());

        let claims = decode(&token_for(&serde_json::json!({
            "roles": null,
            "organizations": null,
            "active_organization_id": null
        })))
        .unwrap();
        assert_eq!(claims, Claims::default());
    }

    #[test]
    fn empty_active_organization_is_treated_as_unset() {
        let claims = decode(&token_for(&serde_json::json!({"active_organization_id": ""}))).unwrap();
        assert_eq!(claims.active_organization_id, None);
    }

    #[test]
    fn unknown_roles_are_dropped_and_scope_is_inferred() {
        let claims = decode(&token_for(&serde_json::json!({
            "roles": [
                {"role": "superuser"},
                {"role": "cin_admin"},
                {"role": "org_admin", "organization_id": "O7"}
            ]
        })))
        .unwrap();

        assert_eq!(
            claims.roles,
            vec![
                RoleAssignment::global(Role::CinAdmin),
                RoleAssignment::organization(Role::OrgAdmin, Some(OrgId::new("O7").unwrap())),
            ]
        );
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        assert!(matches!(decode("abc"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("a.b"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("a.b.c.d"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(""), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("a..c"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn non_object_payloads_are_malformed() {
        assert!(decode("aaa.!!!.ccc").is_err());

        let not_json = format!("aaa.{}.ccc", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(decode(&not_json), Err(DecodeError::Malformed(_))));

        assert!(decode(&token_for(&serde_json::json!([1, 2, 3]))).is_err());
        assert!(decode(&token_for(&serde_json::json!("claims"))).is_err());
    }

    #[test]
    fn structurally_wrong_claims_are_malformed() {
        let token = token_for(&serde_json::json!({"roles": "admin"}));
        assert!(matches!(decode(&token), Err(DecodeError::Malformed(_))));

        let token = token_for(&serde_json::json!({
            "organizations": [{"organization_id": "", "privileges": []}]
        }));
        assert!(matches!(decode(&token), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"x"}"#);
        let claims = decode(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("x"));
    }

    #[test]
    fn decoding_is_deterministic() {
        let token = token_for(&serde_json::json!({"roles": [{"role": "org_admin"}]}));
        assert_eq!(decode(&token), decode(&token));
    }
}
