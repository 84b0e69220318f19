//! Route permission table.
//!
//! Policy is data: protecting a new page is a table edit, never an evaluator
//! change. Lookups are exact-match on the (normalized) path.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use serde::Serialize;

use crate::{PrivilegeType, Role};

/// What a caller must hold to open a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePermission {
    pub path: &'static str,
    /// Any-of.
    pub required_roles: BTreeSet<Role>,
    /// All-of; empty means the role is enough.
    pub required_privileges: BTreeSet<PrivilegeType>,
}

impl RoutePermission {
    pub fn new(path: &'static str, roles: &[Role], privileges: &[PrivilegeType]) -> Self {
        Self {
            path,
            required_roles: roles.iter().copied().collect(),
            required_privileges: privileges.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: HashMap<&'static str, RoutePermission>,
}

static PRODUCT: LazyLock<RouteTable> = LazyLock::new(|| RouteTable::from_entries(product_policy()));

impl RouteTable {
    /// Build a table; later entries for the same path replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = RoutePermission>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.path, e)).collect(),
        }
    }

    /// The console's product policy, built once per process.
    pub fn product() -> &'static RouteTable {
        &PRODUCT
    }

    pub fn lookup(&self, path: &str) -> Option<&RoutePermission> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by path (for audit listings).
    pub fn entries(&self) -> Vec<&RoutePermission> {
        let mut all: Vec<&RoutePermission> = self.entries.values().collect();
        all.sort_by_key(|e| e.path);
        all
    }
}

fn product_policy() -> Vec<RoutePermission> {
    use crate::PrivilegeType as P;
    const ADMIN: &[Role] = &[Role::Admin];

    vec![
        // Platform review queues.
        RoutePermission::new("/mission-approvals", ADMIN, &[P::CIN_ADMINISTRATORS]),
        RoutePermission::new("/reward-approvals", ADMIN, &[P::CIN_ADMINISTRATORS]),
        RoutePermission::new("/organization-approvals", ADMIN, &[P::CIN_ADMINISTRATORS]),
        // Mission partners.
        RoutePermission::new("/create-missions", ADMIN, &[P::MISSION_PARTNERS]),
        RoutePermission::new("/manage-missions", ADMIN, &[P::MISSION_PARTNERS]),
        RoutePermission::new("/task-approvals", ADMIN, &[P::MISSION_PARTNERS]),
        // Reward partners.
        RoutePermission::new("/create-rewards", ADMIN, &[P::REWARD_PARTNERS]),
        RoutePermission::new("/manage-rewards", ADMIN, &[P::REWARD_PARTNERS]),
        // Mobilizing partners.
        RoutePermission::new("/mobilizing-campaigns", ADMIN, &[P::MOBILIZING_PARTNERS]),
        // Any administrator.
        RoutePermission::new("/view-members", ADMIN, &[]),
        RoutePermission::new("/add-members", ADMIN, &[]),
        RoutePermission::new("/analytics", ADMIN, &[]),
        RoutePermission::new("/organization-settings", ADMIN, &[]),
    ]
}
