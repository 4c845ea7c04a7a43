use std::sync::Arc;

use campus_auth::{AccessEvaluator, AccessPolicy};
use campus_tenancy::{InMemoryTenantStore, TenantStore};

use crate::app::dto::StaffRecord;

/// Shared handler dependencies.
pub struct AppServices {
    pub evaluator: AccessEvaluator,
    pub staff: Arc<dyn TenantStore<StaffRecord>>,
}

impl AppServices {
    /// In-memory wiring (dev server and tests).
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            evaluator: AccessEvaluator::new(policy),
            staff: Arc::new(InMemoryTenantStore::new()),
        }
    }
}
