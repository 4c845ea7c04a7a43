//! Human-readable account of an authorization decision, for audit screens
//! and support tooling.

use serde::Serialize;

use campus_core::{TenantId, UserId};

use crate::check::{permission_denial, role_denial};
use crate::{AccessError, AccessEvaluator, Actor, Denial, Requirement};

#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub granted: bool,
    pub reason: String,
    pub requirement: Requirement,
    pub principal: Option<PrincipalSummary>,
    pub denial: Option<DenialKind>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalSummary {
    pub user_id: UserId,
    pub tenant_id: Option<TenantId>,
    pub role: String,
    pub role_level: u32,
    pub is_superuser: bool,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    Role,
    Permission,
    NoRequirement,
}

/// Explain what `evaluator` decides for `actor` against `requirement`.
///
/// The verdict always matches [`AccessEvaluator::authorize`]. When the role
/// gate fails, the permission gate is still reported in `suggestions` so an
/// operator can fix both at once.
pub fn explain(
    evaluator: &AccessEvaluator,
    actor: &Actor,
    requirement: &Requirement,
) -> AccessExplanation {
    let verdict = evaluator.authorize(actor, requirement);
    let hierarchy = evaluator.hierarchy();

    let Some(principal) = actor.principal() else {
        return AccessExplanation {
            granted: false,
            reason: "request is not authenticated".to_string(),
            requirement: requirement.clone(),
            principal: None,
            denial: Some(DenialKind::Unauthenticated),
            suggestions: vec!["sign in before retrying".to_string()],
        };
    };

    let summary = PrincipalSummary {
        user_id: principal.user_id(),
        tenant_id: principal.tenant_id(),
        role: principal.role().to_string(),
        role_level: hierarchy.level(principal.role()),
        is_superuser: principal.is_superuser(),
        permissions: principal.permissions().map(|p| p.to_string()).collect(),
    };

    let (granted, reason, denial) = match &verdict {
        Ok(()) if principal.is_superuser() => {
            (true, "superuser bypasses all checks".to_string(), None)
        }
        Ok(()) if requirement.is_empty() => (
            true,
            "no requirement declared; authentication is sufficient".to_string(),
            None,
        ),
        Ok(()) => (true, "role and permission requirements satisfied".to_string(), None),
        Err(AccessError::Forbidden(d)) => (false, d.to_string(), Some(kind_of(d))),
        Err(e) => (false, e.to_string(), Some(DenialKind::Unauthenticated)),
    };

    let mut suggestions = Vec::new();
    if !granted {
        if let Some(d) = role_denial(hierarchy, principal.role(), requirement) {
            match d {
                Denial::BelowMinimumLevel { required, .. } => {
                    let roles: Vec<String> = hierarchy
                        .roles_at_or_above(required)
                        .iter()
                        .map(|r| r.to_string())
                        .collect();
                    suggestions.push(format!("assign one of the roles {roles:?}"));
                }
                Denial::MissingRole { required, .. } | Denial::MissingAnyRole { required, .. } => {
                    let roles: Vec<String> = required.iter().map(|r| r.to_string()).collect();
                    suggestions.push(format!("assign one of the roles {roles:?}"));
                }
                _ => {}
            }
        }
        match permission_denial(principal, requirement) {
            Some(Denial::MissingPermission(p)) => {
                suggestions.push(format!("grant the permission '{p}'"));
            }
            Some(Denial::MissingAnyPermission(ps)) => {
                let names: Vec<String> = ps.iter().map(|p| p.to_string()).collect();
                suggestions.push(format!("grant any one of {names:?}"));
            }
            _ => {}
        }
        if denial == Some(DenialKind::NoRequirement) {
            suggestions.push("declare a requirement on the handler".to_string());
        }
    }

    AccessExplanation {
        granted,
        reason,
        requirement: requirement.clone(),
        principal: Some(summary),
        denial,
        suggestions,
    }
}

fn kind_of(denial: &Denial) -> DenialKind {
    match denial {
        Denial::MissingRole { .. }
        | Denial::MissingAnyRole { .. }
        | Denial::BelowMinimumLevel { .. } => DenialKind::Role,
        Denial::MissingPermission(_) | Denial::MissingAnyPermission(_) => DenialKind::Permission,
        Denial::NoRequirement | Denial::NoDecision => DenialKind::NoRequirement,
    }
}
