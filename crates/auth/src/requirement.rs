use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// What a handler declares it needs before it runs.
///
/// Precedence inside each gate mirrors how handlers declare it:
/// `permissions` (all) shadows `permissions_any`; `roles` (all) shadows
/// `roles_any`, which shadows `min_role_level`. An empty requirement means
/// "authenticated is enough".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    pub permissions: Vec<Permission>,
    pub permissions_any: Vec<Permission>,
    pub roles: Vec<Role>,
    pub roles_any: Vec<Role>,
    pub min_role_level: Option<u32>,
}

impl Requirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single required permission.
    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self::new().with_permission(permission)
    }

    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn with_any_permission<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions_any
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_any_role(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles_any.extend(roles);
        self
    }

    pub fn with_min_level(mut self, level: u32) -> Self {
        self.min_role_level = Some(level);
        self
    }

    pub fn has_role_gate(&self) -> bool {
        !self.roles.is_empty() || !self.roles_any.is_empty() || self.min_role_level.is_some()
    }

    pub fn has_permission_gate(&self) -> bool {
        !self.permissions.is_empty() || !self.permissions_any.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_role_gate() && !self.has_permission_gate()
    }
}
