use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use campus_core::{ResourceId, TenantId, UserId};

use crate::{Permission, Role};

/// A permission granted on one specific record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectGrant {
    pub permission: Permission,
    pub resource_id: ResourceId,
}

/// An authenticated user as seen by authorization.
///
/// A non-superuser always belongs to exactly one tenant; only superusers may
/// be tenant-less. The constructors enforce this, so the fields stay private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    tenant_id: Option<TenantId>,
    role: Role,
    permissions: BTreeSet<Permission>,
    object_grants: BTreeSet<ObjectGrant>,
    is_superuser: bool,
}

impl Principal {
    /// A regular tenant member.
    pub fn member(user_id: UserId, tenant_id: TenantId, role: Role) -> Self {
        Self {
            user_id,
            tenant_id: Some(tenant_id),
            role,
            permissions: BTreeSet::new(),
            object_grants: BTreeSet::new(),
            is_superuser: false,
        }
    }

    /// A platform superuser, optionally homed in a tenant.
    pub fn superuser(user_id: UserId, tenant_id: Option<TenantId>) -> Self {
        Self {
            user_id,
            tenant_id,
            role: Role::SUPER_ADMIN,
            permissions: BTreeSet::new(),
            object_grants: BTreeSet::new(),
            is_superuser: true,
        }
    }

    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn with_object_grant(
        mut self,
        permission: impl Into<Permission>,
        resource_id: ResourceId,
    ) -> Self {
        self.object_grants.insert(ObjectGrant {
            permission: permission.into(),
            resource_id,
        });
        self
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn has_perm(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Whether an explicit grant for `permission` on `resource_id` exists.
    pub fn has_object_perm(&self, permission: &Permission, resource_id: ResourceId) -> bool {
        self.object_grants
            .iter()
            .any(|g| g.resource_id == resource_id && &g.permission == permission)
    }
}

/// Whoever is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated(Principal),
}

impl Actor {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(p) => Some(p),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Principal> for Actor {
    fn from(value: Principal) -> Self {
        Self::Authenticated(value)
    }
}
