//! Handler-side access guards.
//!
//! Thin wrappers over [`AccessEvaluator`] that record refusals. The
//! evaluator itself stays silent; this is the layer that logs.

use campus_auth::{AccessError, AccessEvaluator, Actor, ObjectPolicy, Requirement};
use campus_core::TenantOwned;
use campus_tenancy::TenantStore;

fn log_denial(actor: &Actor, what: &str, err: &AccessError) {
    let user = actor.principal().map(|p| p.user_id().to_string());
    tracing::debug!(
        user = user.as_deref().unwrap_or("anonymous"),
        tenant = ?campus_tenancy::current_tenant_id(),
        check = what,
        error = %err,
        "access denied"
    );
}

/// Gate a handler on its declared requirement.
pub fn authorize(
    evaluator: &AccessEvaluator,
    actor: &Actor,
    requirement: &Requirement,
) -> Result<(), AccessError> {
    evaluator
        .authorize(actor, requirement)
        .inspect_err(|e| log_denial(actor, "requirement", e))
}

/// Authorize, then list the active tenant's rows.
pub fn scoped_list<V, S>(
    evaluator: &AccessEvaluator,
    actor: &Actor,
    requirement: &Requirement,
    store: &S,
) -> Result<Vec<V>, AccessError>
where
    S: TenantStore<V> + ?Sized,
{
    evaluator
        .scoped_list(actor, requirement, store)
        .inspect_err(|e| log_denial(actor, "requirement", e))
}

/// Check a fetched row; refusals surface as `NotFound`.
pub fn object<'r, R>(
    evaluator: &AccessEvaluator,
    actor: &Actor,
    row: Option<&'r R>,
    policy: &ObjectPolicy,
) -> Result<&'r R, AccessError>
where
    R: TenantOwned + ?Sized,
{
    let found = row.is_some();
    evaluator.authorize_object(actor, row, policy).inspect_err(|e| {
        // A genuinely missing row is not worth a log line.
        if found {
            log_denial(actor, "object", e);
        }
    })
}
