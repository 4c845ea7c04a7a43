use std::sync::Arc;

use axum::{Extension, Json, Router, routing::get};
use serde_json::{Value, json};

use campus_auth::{Actor, Requirement, Role};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new().route("/overview", get(overview))
}

/// Tenant dashboard for school administrators and above.
pub async fn overview(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    let evaluator = &services.evaluator;
    let min = evaluator.hierarchy().level(&Role::ADMIN);
    authz::authorize(evaluator, &actor, &Requirement::new().with_min_level(min))?;

    let tenant = campus_tenancy::current_tenant();
    let filter = evaluator.tenant_filter_with(&actor, false);
    let staff_count = services.staff.list(&filter).len();

    Ok(Json(json!({
        "tenant": tenant.as_ref().map(|t| t.slug.clone()),
        "schema": tenant.as_ref().map(|t| t.schema().to_string()),
        "staff_count": staff_count,
    })))
}
