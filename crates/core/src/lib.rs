//! `cin-core` — shared domain primitives for the CIN console.
//!
//! This crate contains **pure** building blocks (no transport, no storage).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::OrgId;
