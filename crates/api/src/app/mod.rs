//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: evaluator and stores shared by handlers
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: records and their JSON views
//! - `errors.rs`: access errors → HTTP responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use campus_auth::Hs256JwtValidator;
use campus_tenancy::TenantDirectory;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router.
///
/// Layer order, outermost first: tenant resolution, then session, then the
/// handler. `/health` sits outside both.
pub fn build_app(
    config: &ApiConfig,
    directory: Arc<dyn TenantDirectory>,
    services: Arc<services::AppServices>,
) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };
    let tenant_state = middleware::TenantState { directory };

    let tenant_scoped = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            tenant_state,
            middleware::tenant_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(tenant_scoped)
}
