use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde_json::{Value, json};

use campus_auth::{Actor, Requirement};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Who the caller is and which tenant the request resolved to.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    authz::authorize(&services.evaluator, &actor, &Requirement::new())?;

    let tenant = campus_tenancy::current_tenant();
    let principal = actor.principal();
    Ok(Json(json!({
        "tenant": tenant.as_ref().map(|t| t.slug.clone()),
        "user_id": principal.map(|p| p.user_id().to_string()),
        "role": principal.map(|p| p.role().to_string()),
        "is_superuser": principal.is_some_and(|p| p.is_superuser()),
    })))
}
