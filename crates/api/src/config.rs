//! Environment-driven server configuration.
//!
//! | variable | default |
//! |---|---|
//! | `CAMPUS_BIND_ADDR` | `0.0.0.0:8080` |
//! | `CAMPUS_JWT_SECRET` | insecure dev secret |
//! | `CAMPUS_BASE_DOMAIN` | `localhost` |
//! | `CAMPUS_TENANTS` | empty; `slug:Display Name,slug2:Other School` |
//! | `CAMPUS_ACCESS_POLICY` | JSON [`AccessPolicy`]; defaults when unset |
//! | `CAMPUS_DENY_WITHOUT_REQUIREMENT` | `false`; overrides the policy field |

use std::net::SocketAddr;

use anyhow::{Context, bail};

use campus_auth::AccessPolicy;
use campus_tenancy::{InMemoryTenantDirectory, Tenant};

const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub uses_dev_secret: bool,
    pub base_domain: String,
    pub tenants: Vec<(String, String)>,
    pub policy: AccessPolicy,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("CAMPUS_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("CAMPUS_BIND_ADDR is not a socket address")?;

        let (jwt_secret, uses_dev_secret) = match lookup("CAMPUS_JWT_SECRET") {
            Some(s) if !s.is_empty() => (s, false),
            _ => (DEV_SECRET.to_string(), true),
        };

        let base_domain = lookup("CAMPUS_BASE_DOMAIN").unwrap_or_else(|| "localhost".to_string());

        let tenants = match lookup("CAMPUS_TENANTS") {
            Some(raw) => parse_tenants(&raw)?,
            None => Vec::new(),
        };

        let mut policy = match lookup("CAMPUS_ACCESS_POLICY") {
            Some(raw) => serde_json::from_str(&raw)
                .context("CAMPUS_ACCESS_POLICY is not valid JSON")?,
            None => AccessPolicy::default(),
        };
        if let Some(raw) = lookup("CAMPUS_DENY_WITHOUT_REQUIREMENT") {
            policy.deny_without_requirement = parse_bool(&raw)
                .with_context(|| format!("CAMPUS_DENY_WITHOUT_REQUIREMENT: '{raw}'"))?;
        }

        Ok(Self {
            bind_addr,
            jwt_secret,
            uses_dev_secret,
            base_domain,
            tenants,
            policy,
        })
    }

    /// Directory with every configured tenant reachable at `<slug>.<base_domain>`.
    pub fn build_directory(&self) -> anyhow::Result<InMemoryTenantDirectory> {
        let directory = InMemoryTenantDirectory::with_base_domain(&self.base_domain)?;
        for (slug, name) in &self.tenants {
            directory
                .register_tenant(Tenant::new(slug.clone(), name.clone())?)
                .with_context(|| format!("CAMPUS_TENANTS: cannot register '{slug}'"))?;
        }
        Ok(directory)
    }
}

fn parse_tenants(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (slug, name) = entry.split_once(':').unwrap_or((entry, entry));
            Ok((slug.trim().to_string(), name.trim().to_string()))
        })
        .collect()
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
