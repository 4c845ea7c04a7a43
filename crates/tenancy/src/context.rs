//! The active tenant for the current unit of work.
//!
//! Each execution context owns one cell holding at most one [`Tenant`]:
//!
//! - inside [`scope`] the cell is task-local, so it follows the future across
//!   worker threads and vanishes when the future finishes;
//! - outside any scope the cell is thread-local.
//!
//! Temporary overrides go through [`with_tenant`], which restores the prior
//! value on every exit path, unwinding included.

use std::cell::RefCell;
use std::future::Future;

use campus_core::TenantId;

use crate::Tenant;

type TenantCell = RefCell<Option<Tenant>>;

thread_local! {
    static THREAD_TENANT: TenantCell = const { RefCell::new(None) };
}

tokio::task_local! {
    static TASK_TENANT: TenantCell;
}

fn with_cell<R>(f: impl FnOnce(&TenantCell) -> R) -> R {
    if TASK_TENANT.try_with(|_| ()).is_ok() {
        TASK_TENANT.with(f)
    } else {
        THREAD_TENANT.with(f)
    }
}

fn replace(tenant: Option<Tenant>) -> Option<Tenant> {
    with_cell(|cell| cell.replace(tenant))
}

/// Store `tenant` as the active tenant of the calling context.
pub fn set_current_tenant(tenant: Option<Tenant>) {
    replace(tenant);
}

/// The active tenant of the calling context, or `None` if nothing is set.
pub fn current_tenant() -> Option<Tenant> {
    with_cell(|cell| cell.borrow().clone())
}

/// Id of the active tenant, without cloning the whole record.
pub fn current_tenant_id() -> Option<TenantId> {
    with_cell(|cell| cell.borrow().as_ref().map(|t| t.id))
}

/// Remove the active tenant. No-op when nothing is set.
pub fn clear_current_tenant() {
    replace(None);
}

/// Run `body` with `tenant` active, then put the previous value back.
///
/// Restoration happens in a drop guard, so an early `return`, an `Err` or a
/// panic inside `body` all leave the context exactly as it was.
pub fn with_tenant<R>(tenant: Option<Tenant>, body: impl FnOnce() -> R) -> R {
    let _restore = Restore {
        prior: Some(replace(tenant)),
    };
    body()
}

struct Restore {
    prior: Option<Option<Tenant>>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            replace(prior);
        }
    }
}

/// Drive `fut` inside its own task-local tenant cell initialised to `tenant`.
///
/// The cell lives exactly as long as the future; nothing is written to the
/// worker thread, so a pooled thread that later polls an unrelated request
/// cannot observe this tenant.
pub async fn scope<F>(tenant: Option<Tenant>, fut: F) -> F::Output
where
    F: Future,
{
    TASK_TENANT.scope(RefCell::new(tenant), fut).await
}
