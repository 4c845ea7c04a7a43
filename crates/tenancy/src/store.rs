use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use campus_core::{DomainError, DomainResult, ResourceId, TenantId, TenantOwned};

use crate::TenantFilter;

/// Tenant-isolated record store.
///
/// Rows are keyed by `(tenant, id)`, so a tenant filter is a key-range
/// lookup rather than a scan-and-discard. A record's tenant is fixed by its
/// first write.
pub trait TenantStore<V>: Send + Sync {
    /// Fetch by id regardless of tenant. Callers must run the result through
    /// an object-level check before exposing it.
    fn get(&self, id: ResourceId) -> Option<V>;

    /// Fetch by id within the rows admitted by `filter`.
    fn find(&self, filter: &TenantFilter, id: ResourceId) -> Option<V>;

    /// Insert or replace a record. Fails if the id already belongs to
    /// another tenant.
    fn insert(&self, value: V) -> DomainResult<()>;

    fn list(&self, filter: &TenantFilter) -> Vec<V>;
}

impl<V, S> TenantStore<V> for Arc<S>
where
    S: TenantStore<V> + ?Sized,
{
    fn get(&self, id: ResourceId) -> Option<V> {
        (**self).get(id)
    }

    fn find(&self, filter: &TenantFilter, id: ResourceId) -> Option<V> {
        (**self).find(filter, id)
    }

    fn insert(&self, value: V) -> DomainResult<()> {
        (**self).insert(value)
    }

    fn list(&self, filter: &TenantFilter) -> Vec<V> {
        (**self).list(filter)
    }
}

#[derive(Debug)]
struct Rows<V> {
    by_key: BTreeMap<(TenantId, ResourceId), V>,
    owner: HashMap<ResourceId, TenantId>,
}

/// In-memory store for tests and the demo server.
#[derive(Debug)]
pub struct InMemoryTenantStore<V> {
    inner: RwLock<Rows<V>>,
}

impl<V> InMemoryTenantStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                by_key: BTreeMap::new(),
                owner: HashMap::new(),
            }),
        }
    }
}

impl<V> Default for InMemoryTenantStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn tenant_bounds(tenant_id: TenantId) -> ((TenantId, ResourceId), (TenantId, ResourceId)) {
    (
        (tenant_id, ResourceId::from_uuid(Uuid::nil())),
        (tenant_id, ResourceId::from_uuid(Uuid::from_u128(u128::MAX))),
    )
}

impl<V> TenantStore<V> for InMemoryTenantStore<V>
where
    V: TenantOwned + Clone + Send + Sync + 'static,
{
    fn get(&self, id: ResourceId) -> Option<V> {
        let rows = self.inner.read().ok()?;
        let tenant_id = *rows.owner.get(&id)?;
        rows.by_key.get(&(tenant_id, id)).cloned()
    }

    fn find(&self, filter: &TenantFilter, id: ResourceId) -> Option<V> {
        match filter {
            TenantFilter::Nothing => None,
            TenantFilter::Only(t) => {
                let rows = self.inner.read().ok()?;
                rows.by_key.get(&(*t, id)).cloned()
            }
            TenantFilter::AllTenants => self.get(id),
        }
    }

    fn insert(&self, value: V) -> DomainResult<()> {
        let (tenant_id, id) = (value.tenant_id(), value.resource_id());
        let mut rows = self
            .inner
            .write()
            .map_err(|_| DomainError::validation("record store is poisoned"))?;

        match rows.owner.get(&id).copied() {
            Some(owner) if owner != tenant_id => Err(DomainError::validation(format!(
                "record {id} belongs to tenant {owner}; cannot move it to {tenant_id}"
            ))),
            _ => {
                rows.owner.insert(id, tenant_id);
                rows.by_key.insert((tenant_id, id), value);
                Ok(())
            }
        }
    }

    fn list(&self, filter: &TenantFilter) -> Vec<V> {
        let rows = match self.inner.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        match filter {
            TenantFilter::Nothing => vec![],
            TenantFilter::AllTenants => rows.by_key.values().cloned().collect(),
            TenantFilter::Only(t) => {
                let (lo, hi) = tenant_bounds(*t);
                rows.by_key.range(lo..=hi).map(|(_k, v)| v.clone()).collect()
            }
        }
    }
}
