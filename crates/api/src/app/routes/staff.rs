use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, routing::get};
use serde_json::{Value, json};

use campus_auth::{Actor, ObjectPolicy, Requirement};
use campus_core::ResourceId;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{dto, routes::perms};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_staff))
        .route("/:id", get(get_staff))
        .route("/:id/payslip", get(get_payslip))
}

pub async fn list_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    let rows = authz::scoped_list(
        &services.evaluator,
        &actor,
        &Requirement::permission(perms::VIEW_STAFF),
        services.staff.as_ref(),
    )?;

    let items: Vec<Value> = rows.iter().map(dto::staff_summary).collect();
    Ok(Json(json!({ "items": items })))
}

pub async fn get_staff(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let requirement = Requirement::permission(perms::VIEW_STAFF);
    authz::authorize(&services.evaluator, &actor, &requirement)?;

    let policy = ObjectPolicy::tenant_only();
    let row = fetch(&services, &actor, &id, &policy);
    let row = authz::object(&services.evaluator, &actor, row.as_ref(), &policy)?;
    Ok(Json(dto::staff_detail(row)))
}

/// Salary details: only the staff member, whoever filed the record, or
/// someone granted `finance.view_payslip` on it.
pub async fn get_payslip(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let requirement = Requirement::permission(perms::VIEW_STAFF);
    authz::authorize(&services.evaluator, &actor, &requirement)?;

    let policy = ObjectPolicy::owned_or_granted(perms::VIEW_PAYSLIP);
    let row = fetch(&services, &actor, &id, &policy);
    let row = authz::object(&services.evaluator, &actor, row.as_ref(), &policy)?;
    Ok(Json(dto::payslip(row)))
}

/// Look the row up within the actor's tenant filter. Malformed ids fall
/// through as "no row" so they render like any other miss.
fn fetch(
    services: &AppServices,
    actor: &Actor,
    id: &str,
    policy: &ObjectPolicy,
) -> Option<dto::StaffRecord> {
    let id: ResourceId = id.parse().ok()?;
    let filter = services.evaluator.tenant_filter_with(actor, policy.allow_superuser);
    services.staff.find(&filter, id)
}
