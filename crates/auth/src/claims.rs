use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use cin_core::OrgId;

use crate::{OrganizationMembership, RoleAssignment};

/// Clock skew tolerated between the identity provider and this process.
pub const CLOCK_SKEW_LEEWAY_SECONDS: i64 = 5;

/// Session claims as carried by the identity provider's token.
///
/// Produced by [`crate::decoder::decode`]; never constructed from request input
/// any other way. Derived fresh on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Subject (user identifier at the identity provider).
    pub subject: Option<String>,

    pub issued_at: Option<DateTime<Utc>>,

    pub expires_at: Option<DateTime<Utc>>,

    /// Organization the caller currently acts for.
    pub active_organization_id: Option<OrgId>,

    pub roles: Vec<RoleAssignment>,

    pub organizations: Vec<OrganizationMembership>,
}

impl Claims {
    pub fn with_role(mut self, assignment: RoleAssignment) -> Self {
        self.roles.push(assignment);
        self
    }

    pub fn with_organization(mut self, membership: OrganizationMembership) -> Self {
        self.organizations.push(membership);
        self
    }

    pub fn with_active_organization(mut self, id: OrgId) -> Self {
        self.active_organization_id = Some(id);
        self
    }

    /// Returns a copy with a different active organization; memberships are untouched.
    pub fn switch_organization(&self, id: Option<OrgId>) -> Self {
        Self {
            active_organization_id: id,
            ..self.clone()
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,
}

/// Check the time window embedded in the claims.
///
/// Signature verification is the identity provider's concern; this only
/// rejects stale or future-dated sessions. Missing timestamps are not an error.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let leeway = Duration::seconds(CLOCK_SKEW_LEEWAY_SECONDS);

    if let Some(issued_at) = claims.issued_at {
        if now + leeway < issued_at {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if let Some(expires_at) = claims.expires_at {
        if now >= expires_at + leeway {
            return Err(TokenValidationError::Expired);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn claims_without_timestamps_are_valid() {
        assert_eq!(validate_claims(&Claims::default(), at(1_000)), Ok(()));
    }

    #[test]
    fn expired_claims_are_rejected_after_leeway() {
        let claims = Claims {
            issued_at: Some(at(1_000)),
            expires_at: Some(at(2_000)),
            ..Claims::default()
        };
        assert_eq!(validate_claims(&claims, at(1_500)), Ok(()));
        assert_eq!(validate_claims(&claims, at(2_003)), Ok(()));
        assert_eq!(
            validate_claims(&claims, at(2_005)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_dated_claims_are_rejected() {
        let claims = Claims {
            issued_at: Some(at(10_000)),
            ..Claims::default()
        };
        assert_eq!(
            validate_claims(&claims, at(9_000)),
            Err(TokenValidationError::NotYetValid)
        );
        assert_eq!(validate_claims(&claims, at(9_997)), Ok(()));
    }

    #[test]
    fn switching_organization_keeps_memberships() {
        let o1 = OrgId::new("O1").unwrap();
        let o2 = OrgId::new("O2").unwrap();
        let claims = Claims::default()
            .with_organization(OrganizationMembership::new(o1.clone(), "One"))
            .with_organization(OrganizationMembership::new(o2.clone(), "Two"))
            .with_active_organization(o1);

        let switched = claims.switch_organization(Some(o2.clone()));
        assert_eq!(switched.active_organization_id, Some(o2));
        assert_eq!(switched.organizations, claims.organizations);
    }
}
