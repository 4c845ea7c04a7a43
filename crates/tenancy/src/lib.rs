//! `campus-tenancy`: tenant model, per-request tenant context, and
//! tenant-isolated storage.
//!
//! Nothing here knows about HTTP. The API layer resolves a host to a tenant
//! and runs the request inside [`context::scope`]; everything below reads the
//! active tenant through [`context::current_tenant`].

pub mod context;
pub mod filter;
pub mod resolver;
pub mod store;
pub mod tenant;

pub use context::{
    clear_current_tenant, current_tenant, current_tenant_id, scope, set_current_tenant,
    with_tenant,
};
pub use filter::TenantFilter;
pub use resolver::{InMemoryTenantDirectory, ResolveError, TenantDirectory};
pub use store::{InMemoryTenantStore, TenantStore};
pub use tenant::{Domain, Tenant, normalize_host};
