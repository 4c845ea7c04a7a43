//! `campus-auth`: tenant-scoped authorization boundary.
//!
//! Pure policy: no HTTP, no storage, no logging. Callers hand in an [`Actor`]
//! and a declared [`Requirement`]; the [`AccessEvaluator`] answers with
//! `Ok(())` or an [`AccessError`] and hands out the [`TenantFilter`]
//! collection queries must apply.
//!
//! [`TenantFilter`]: campus_tenancy::TenantFilter

pub mod check;
pub mod claims;
pub mod evaluator;
pub mod explain;
pub mod permissions;
pub mod principal;
pub mod requirement;
pub mod roles;

pub use check::{
    AccessCheck, Authenticated, CheckChain, DefaultDecision, PermissionCheck, RoleCheck,
    SuperuserBypass, Verdict,
};
pub use claims::{
    ClaimsError, Hs256JwtValidator, JwtValidator, SessionClaims, TokenError, validate_claims,
};
pub use evaluator::{AccessError, AccessEvaluator, AccessPolicy, Denial, ObjectPolicy};
pub use explain::{AccessExplanation, DenialKind, explain};
pub use permissions::Permission;
pub use principal::{Actor, ObjectGrant, Principal};
pub use requirement::Requirement;
pub use roles::{Role, RoleHierarchy};
