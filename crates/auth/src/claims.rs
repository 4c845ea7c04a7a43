use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::{TenantId, UserId};

use crate::{ObjectGrant, Permission, Principal, Role};

/// Session claims carried by a signed token.
///
/// Signature checks live in [`JwtValidator`]; [`validate_claims`] only looks
/// at the time window so it stays deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,

    #[serde(default)]
    pub tenant_id: Option<TenantId>,

    pub role: Role,

    #[serde(default)]
    pub permissions: Vec<Permission>,

    #[serde(default)]
    pub object_grants: Vec<ObjectGrant>,

    #[serde(default)]
    pub is_superuser: bool,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("non-superuser session carries no tenant")]
    MissingTenant,
}

/// Check the claims' validity window against `now`.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), ClaimsError> {
    if claims.expires_at <= claims.issued_at {
        return Err(ClaimsError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(ClaimsError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(ClaimsError::Expired);
    }
    Ok(())
}

impl SessionClaims {
    /// Build the principal these claims describe.
    pub fn into_principal(self) -> Result<Principal, ClaimsError> {
        let base = if self.is_superuser {
            Principal::superuser(self.sub, self.tenant_id)
        } else {
            let tenant_id = self.tenant_id.ok_or(ClaimsError::MissingTenant)?;
            Principal::member(self.sub, tenant_id, self.role)
        };

        let principal = base.with_permissions(self.permissions);
        Ok(self
            .object_grants
            .into_iter()
            .fold(principal, |p, g| p.with_object_grant(g.permission, g.resource_id)))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Decode(String),

    #[error(transparent)]
    Claims(#[from] ClaimsError),
}

/// Turns a bearer token into a principal.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError>;
}

/// HMAC-SHA256 token validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The time window is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let claims = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| TokenError::Decode(e.to_string()))?
            .claims;

        validate_claims(&claims, now)?;
        Ok(claims.into_principal()?)
    }
}
