use serde::Serialize;

use campus_core::TenantId;

/// Row-level tenant constraint for collection queries.
///
/// Storage backends translate this into an equality predicate on the tenant
/// column. `Nothing` is what an unresolved or mismatched tenant produces; it
/// never widens to "every tenant".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tenant_id", rename_all = "snake_case")]
pub enum TenantFilter {
    /// No tenant constraint (superuser cross-tenant view).
    AllTenants,
    /// Only rows owned by this tenant.
    Only(TenantId),
    /// Matches no rows.
    Nothing,
}

impl TenantFilter {
    pub fn matches(&self, tenant_id: TenantId) -> bool {
        match self {
            Self::AllTenants => true,
            Self::Only(t) => *t == tenant_id,
            Self::Nothing => false,
        }
    }

    /// The tenant this filter pins to, if it pins to exactly one.
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            Self::Only(t) => Some(*t),
            _ => None,
        }
    }
}
