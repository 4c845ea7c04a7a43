//! Contract for records that live inside a tenant boundary.

use crate::{ResourceId, TenantId, UserId};

/// A record that belongs to exactly one tenant.
///
/// The tenant is fixed at creation. Ownership accessors default to `None`;
/// records with a per-user owner (a guardian's application, a staff member's
/// payslip) override them.
pub trait TenantOwned {
    fn resource_id(&self) -> ResourceId;

    fn tenant_id(&self) -> TenantId;

    /// The user the record is about or belongs to.
    fn owner_id(&self) -> Option<UserId> {
        None
    }

    /// The user who created the record.
    fn created_by(&self) -> Option<UserId> {
        None
    }
}

impl<T: TenantOwned + ?Sized> TenantOwned for &T {
    fn resource_id(&self) -> ResourceId {
        (**self).resource_id()
    }

    fn tenant_id(&self) -> TenantId {
        (**self).tenant_id()
    }

    fn owner_id(&self) -> Option<UserId> {
        (**self).owner_id()
    }

    fn created_by(&self) -> Option<UserId> {
        (**self).created_by()
    }
}
