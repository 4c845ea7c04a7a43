use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Role tag carried by a principal.
///
/// Roles are opaque strings; their ordering comes from a [`RoleHierarchy`],
/// not from the tag itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("super_admin"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));
    pub const TEACHER: Role = Role(Cow::Borrowed("teacher"));
    pub const STUDENT: Role = Role(Cow::Borrowed("student"));
    pub const GUARDIAN: Role = Role(Cow::Borrowed("guardian"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role → level table used by "at least" checks.
///
/// Roles missing from the table rank at level 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleHierarchy {
    levels: BTreeMap<Role, u32>,
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::empty()
            .with_role(Role::SUPER_ADMIN, 100)
            .with_role(Role::ADMIN, 80)
            .with_role(Role::STAFF, 60)
            .with_role(Role::TEACHER, 40)
            .with_role(Role::STUDENT, 20)
            .with_role(Role::GUARDIAN, 10)
    }
}

impl RoleHierarchy {
    pub fn empty() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: Role, level: u32) -> Self {
        self.levels.insert(role, level);
        self
    }

    pub fn level(&self, role: &Role) -> u32 {
        self.levels.get(role).copied().unwrap_or(0)
    }

    pub fn meets(&self, role: &Role, minimum: u32) -> bool {
        self.level(role) >= minimum
    }

    /// Roles that satisfy `minimum`, highest first.
    pub fn roles_at_or_above(&self, minimum: u32) -> Vec<Role> {
        let mut roles: Vec<(&Role, u32)> = self
            .levels
            .iter()
            .filter(|(_, level)| **level >= minimum)
            .map(|(role, level)| (role, *level))
            .collect();
        roles.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        roles.into_iter().map(|(role, _)| role.clone()).collect()
    }
}
