use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Privilege identifier granted to an organization (e.g. "mission_partners").
///
/// Privilege types are an open set at the token level, so they are modeled as
/// opaque strings; the constants below are the ones product policy refers to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegeType(Cow<'static, str>);

impl PrivilegeType {
    pub const CIN_ADMINISTRATORS: PrivilegeType = PrivilegeType(Cow::Borrowed("cin_administrators"));
    pub const MISSION_PARTNERS: PrivilegeType = PrivilegeType(Cow::Borrowed("mission_partners"));
    pub const REWARD_PARTNERS: PrivilegeType = PrivilegeType(Cow::Borrowed("reward_partners"));
    pub const MOBILIZING_PARTNERS: PrivilegeType = PrivilegeType(Cow::Borrowed("mobilizing_partners"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review state of a privilege request. Only `Approved` ever grants access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    #[serde(rename = "type")]
    pub kind: PrivilegeType,
    pub status: PrivilegeStatus,
}

impl Privilege {
    pub fn new(kind: PrivilegeType, status: PrivilegeStatus) -> Self {
        Self { kind, status }
    }

    pub fn approved(kind: PrivilegeType) -> Self {
        Self::new(kind, PrivilegeStatus::Approved)
    }

    pub fn is_effective(&self) -> bool {
        self.status == PrivilegeStatus::Approved
    }
}
