//! `cin-auth` — request authorization core for the CIN console.
//!
//! Session token in, routing decision out. This crate is intentionally
//! decoupled from HTTP and storage; it never verifies token signatures.
//!
//! Flow per request: [`decoder`] → [`resolver`] → [`authorize`], orchestrated
//! by [`gate`].

pub mod authorize;
pub mod claims;
pub mod decoder;
pub mod gate;
pub mod membership;
pub mod paths;
pub mod privileges;
pub mod resolver;
pub mod roles;
pub mod routes;

pub use authorize::{
    AuthorizationDecision, DecisionExplanation, Diagnostics, ReasonCode, Redirect, decide, decide_with, explain,
    explain_with,
};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use decoder::{DecodeError, decode};
pub use gate::{Gate, GateConfig, ResponseAction, Session};
pub use membership::OrganizationMembership;
pub use privileges::{Privilege, PrivilegeStatus, PrivilegeType};
pub use resolver::{ResolveError, active_organization, effective_privileges, effective_roles};
pub use roles::{Role, RoleAssignment, RoleScope};
pub use routes::{RoutePermission, RouteTable};
