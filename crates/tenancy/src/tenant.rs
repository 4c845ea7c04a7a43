use serde::{Deserialize, Serialize};

use campus_core::{DomainError, DomainResult, TenantId};

/// Schema used when a tenant has no dedicated schema.
pub const PUBLIC_SCHEMA: &str = "public";

/// An isolation boundary: one school (or school group) and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub schema_name: Option<String>,
}

impl Tenant {
    /// Create an active tenant with a fresh id.
    ///
    /// The slug doubles as the subdomain label, so it is restricted to
    /// lowercase ascii letters, digits and `-`.
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> DomainResult<Self> {
        let slug = slug.into();
        validate_slug(&slug)?;

        Ok(Self {
            id: TenantId::new(),
            slug,
            name: name.into(),
            is_active: true,
            schema_name: None,
        })
    }

    pub fn with_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Database schema holding this tenant's rows.
    pub fn schema(&self) -> &str {
        self.schema_name.as_deref().unwrap_or(PUBLIC_SCHEMA)
    }
}

fn validate_slug(slug: &str) -> DomainResult<()> {
    if slug.is_empty() {
        return Err(DomainError::validation("tenant slug must not be empty"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(DomainError::validation(format!(
            "tenant slug '{slug}' must not start or end with '-'"
        )));
    }
    let ok = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok {
        return Err(DomainError::validation(format!(
            "tenant slug '{slug}' may only contain a-z, 0-9 and '-'"
        )));
    }
    Ok(())
}

/// A hostname routed to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    host: String,
    pub tenant_id: TenantId,
    pub is_primary: bool,
}

impl Domain {
    pub fn new(host: &str, tenant_id: TenantId) -> DomainResult<Self> {
        let host = normalize_host(host)
            .ok_or_else(|| DomainError::validation(format!("invalid host '{host}'")))?;

        Ok(Self {
            host,
            tenant_id,
            is_primary: false,
        })
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Normalise a `Host` header value: lowercase, no port, no trailing dot.
///
/// Returns `None` for values that cannot be a hostname.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let without_port = match raw.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => raw,
    };
    let host = without_port.trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() || host.starts_with('.') || host.contains("..") {
        return None;
    }
    let valid = host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    valid.then_some(host)
}
