use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use campus_core::{DomainError, DomainResult, TenantId};

use crate::{Domain, Tenant, normalize_host};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no tenant is mapped to host '{0}'")]
    UnknownHost(String),

    #[error("tenant '{0}' is inactive")]
    Inactive(String),
}

/// Maps request hosts to tenants.
pub trait TenantDirectory: Send + Sync {
    /// Resolve a raw `Host` header value to an active tenant.
    fn resolve_host(&self, host: &str) -> Result<Tenant, ResolveError>;
}

/// In-memory directory of tenants and their domains.
///
/// Resolution order: an exact registered [`Domain`], then
/// `<slug>.<base_domain>` when a base domain is configured.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    base_domain: Option<String>,
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    domains: RwLock<HashMap<String, Domain>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable subdomain routing under `base` (e.g. `campus.test`).
    pub fn with_base_domain(base: &str) -> DomainResult<Self> {
        let base = normalize_host(base)
            .ok_or_else(|| DomainError::validation(format!("invalid base domain '{base}'")))?;
        Ok(Self {
            base_domain: Some(base),
            ..Self::default()
        })
    }

    /// Insert or replace a tenant, keyed by id. Slugs are unique: a slug
    /// already held by a different tenant is refused.
    pub fn register_tenant(&self, tenant: Tenant) -> DomainResult<()> {
        let mut map = self
            .tenants
            .write()
            .map_err(|_| DomainError::validation("tenant table is poisoned"))?;

        if let Some(holder) = map
            .values()
            .find(|t| t.slug == tenant.slug && t.id != tenant.id)
        {
            return Err(DomainError::validation(format!(
                "slug '{}' is already used by tenant {}",
                tenant.slug, holder.id
            )));
        }
        map.insert(tenant.id, tenant);
        Ok(())
    }

    /// Route a host to an already registered tenant.
    pub fn add_domain(&self, domain: Domain) -> DomainResult<()> {
        if self.tenant(domain.tenant_id).is_none() {
            return Err(DomainError::validation(format!(
                "domain '{}' points at unknown tenant {}",
                domain.host(),
                domain.tenant_id
            )));
        }
        let mut map = self
            .domains
            .write()
            .map_err(|_| DomainError::validation("domain table is poisoned"))?;
        map.insert(domain.host().to_string(), domain);
        Ok(())
    }

    pub fn tenant(&self, id: TenantId) -> Option<Tenant> {
        self.tenants.read().ok()?.get(&id).cloned()
    }

    fn by_slug(&self, slug: &str) -> Option<Tenant> {
        let map = self.tenants.read().ok()?;
        map.values().find(|t| t.slug == slug).cloned()
    }

    fn by_domain(&self, host: &str) -> Option<Tenant> {
        let tenant_id = self.domains.read().ok()?.get(host)?.tenant_id;
        self.tenant(tenant_id)
    }

    fn subdomain_label<'h>(&self, host: &'h str) -> Option<&'h str> {
        let base = self.base_domain.as_deref()?;
        let label = host.strip_suffix(base)?.strip_suffix('.')?;
        (!label.is_empty() && !label.contains('.')).then_some(label)
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn resolve_host(&self, host: &str) -> Result<Tenant, ResolveError> {
        let normalized =
            normalize_host(host).ok_or_else(|| ResolveError::UnknownHost(host.to_string()))?;

        let tenant = self
            .by_domain(&normalized)
            .or_else(|| {
                self.subdomain_label(&normalized)
                    .and_then(|label| self.by_slug(label))
            })
            .ok_or(ResolveError::UnknownHost(normalized))?;

        if !tenant.is_active {
            return Err(ResolveError::Inactive(tenant.slug));
        }
        Ok(tenant)
    }
}
