use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;

use campus_auth::{Actor, JwtValidator};
use campus_tenancy::{ResolveError, TenantDirectory};

use crate::app::errors::json_error;

#[derive(Clone)]
pub struct TenantState {
    pub directory: Arc<dyn TenantDirectory>,
}

/// Resolve the tenant from the `Host` header and run the rest of the request
/// inside its tenant scope. The scope ends with the request future.
pub async fn tenant_middleware(
    State(state): State<TenantState>,
    req: Request,
    next: Next,
) -> Response {
    let host = request_host(&req).unwrap_or_default().to_string();

    match state.directory.resolve_host(&host) {
        Ok(tenant) => {
            tracing::debug!(tenant = %tenant.slug, schema = tenant.schema(), "tenant resolved");
            let span = tracing::info_span!("tenant", tenant = %tenant.slug);

            campus_tenancy::scope(Some(tenant), next.run(req))
                .instrument(span)
                .await
        }
        Err(ResolveError::UnknownHost(h)) => {
            tracing::info!(host = %h, "request for unknown host");
            json_error(
                StatusCode::NOT_FOUND,
                "unknown_tenant",
                "no school is served at this address",
            )
        }
        Err(ResolveError::Inactive(slug)) => {
            tracing::info!(tenant = %slug, "request for inactive tenant");
            json_error(StatusCode::FORBIDDEN, "tenant_inactive", "this school account is inactive")
        }
    }
}

fn request_host(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Attach the request's [`Actor`]. Missing or invalid sessions become
/// [`Actor::Anonymous`]; refusing them is the access guard's job.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let actor = match extract_bearer(req.headers()) {
        None => Actor::Anonymous,
        Some(token) => match state.jwt.validate(token, Utc::now()) {
            Ok(principal) => Actor::Authenticated(principal),
            Err(e) => {
                tracing::debug!(error = %e, "session rejected");
                Actor::Anonymous
            }
        },
    };

    req.extensions_mut().insert(actor);
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    (!token.is_empty()).then_some(token)
}
