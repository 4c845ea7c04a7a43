//! Composable authorization checks.
//!
//! Each check looks at the actor and the declared requirement and either
//! decides ([`Verdict::Grant`] / [`Verdict::Deny`]) or passes
//! ([`Verdict::Abstain`]). A [`CheckChain`] runs checks in order and stops at
//! the first decision.

use crate::{AccessError, AccessPolicy, Actor, Denial, Principal, Requirement, Role, RoleHierarchy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Grant,
    Deny(AccessError),
    Abstain,
}

pub trait AccessCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, actor: &Actor, requirement: &Requirement) -> Verdict;
}

/// Denies anonymous actors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

impl AccessCheck for Authenticated {
    fn name(&self) -> &'static str {
        "authenticated"
    }

    fn evaluate(&self, actor: &Actor, _requirement: &Requirement) -> Verdict {
        if actor.is_authenticated() {
            Verdict::Abstain
        } else {
            Verdict::Deny(AccessError::Unauthenticated)
        }
    }
}

/// Grants everything to superusers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperuserBypass;

impl AccessCheck for SuperuserBypass {
    fn name(&self) -> &'static str {
        "superuser_bypass"
    }

    fn evaluate(&self, actor: &Actor, _requirement: &Requirement) -> Verdict {
        match actor.principal() {
            Some(p) if p.is_superuser() => Verdict::Grant,
            _ => Verdict::Abstain,
        }
    }
}

/// Enforces the role gate. Must run before [`PermissionCheck`] so a role
/// mismatch denies even when the permission is held.
#[derive(Debug, Clone, Default)]
pub struct RoleCheck {
    hierarchy: RoleHierarchy,
}

impl RoleCheck {
    pub fn new(hierarchy: RoleHierarchy) -> Self {
        Self { hierarchy }
    }
}

impl AccessCheck for RoleCheck {
    fn name(&self) -> &'static str {
        "role"
    }

    fn evaluate(&self, actor: &Actor, requirement: &Requirement) -> Verdict {
        let Some(principal) = actor.principal() else {
            return Verdict::Deny(AccessError::Unauthenticated);
        };
        match role_denial(&self.hierarchy, principal.role(), requirement) {
            Some(denial) => Verdict::Deny(AccessError::Forbidden(denial)),
            None => Verdict::Abstain,
        }
    }
}

pub(crate) fn role_denial(
    hierarchy: &RoleHierarchy,
    role: &Role,
    requirement: &Requirement,
) -> Option<Denial> {
    if !requirement.roles.is_empty() {
        // A principal has one role, so "all of" only holds when every
        // listed role is that role.
        if requirement.roles.iter().all(|r| r == role) {
            None
        } else {
            Some(Denial::MissingRole {
                required: requirement.roles.clone(),
                actual: role.clone(),
            })
        }
    } else if !requirement.roles_any.is_empty() {
        if requirement.roles_any.contains(role) {
            None
        } else {
            Some(Denial::MissingAnyRole {
                required: requirement.roles_any.clone(),
                actual: role.clone(),
            })
        }
    } else if let Some(required) = requirement.min_role_level {
        let actual = hierarchy.level(role);
        (actual < required).then_some(Denial::BelowMinimumLevel { required, actual })
    } else {
        None
    }
}

/// Enforces the permission gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionCheck;

impl AccessCheck for PermissionCheck {
    fn name(&self) -> &'static str {
        "permission"
    }

    fn evaluate(&self, actor: &Actor, requirement: &Requirement) -> Verdict {
        let Some(principal) = actor.principal() else {
            return Verdict::Deny(AccessError::Unauthenticated);
        };
        match permission_denial(principal, requirement) {
            Some(denial) => Verdict::Deny(AccessError::Forbidden(denial)),
            None => Verdict::Abstain,
        }
    }
}

pub(crate) fn permission_denial(
    principal: &Principal,
    requirement: &Requirement,
) -> Option<Denial> {
    if !requirement.permissions.is_empty() {
        requirement
            .permissions
            .iter()
            .find(|p| !principal.has_perm(p))
            .map(|p| Denial::MissingPermission(p.clone()))
    } else if !requirement.permissions_any.is_empty() {
        if requirement.permissions_any.iter().any(|p| principal.has_perm(p)) {
            None
        } else {
            Some(Denial::MissingAnyPermission(requirement.permissions_any.clone()))
        }
    } else {
        None
    }
}

/// Terminal check: grants whatever survived the earlier checks.
///
/// With `deny_without_requirement` set, a handler that declared nothing is
/// refused instead of being let through on authentication alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecision {
    pub deny_without_requirement: bool,
}

impl AccessCheck for DefaultDecision {
    fn name(&self) -> &'static str {
        "default"
    }

    fn evaluate(&self, _actor: &Actor, requirement: &Requirement) -> Verdict {
        if self.deny_without_requirement && requirement.is_empty() {
            Verdict::Deny(AccessError::Forbidden(Denial::NoRequirement))
        } else {
            Verdict::Grant
        }
    }
}

/// Ordered list of checks; first non-abstaining verdict wins.
///
/// A chain where every check abstains denies.
#[derive(Default)]
pub struct CheckChain {
    checks: Vec<Box<dyn AccessCheck>>,
}

impl CheckChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// authenticated → superuser → role → permission → default.
    pub fn standard(policy: &AccessPolicy) -> Self {
        Self::new()
            .then(Authenticated)
            .then(SuperuserBypass)
            .then(RoleCheck::new(policy.hierarchy.clone()))
            .then(PermissionCheck)
            .then(DefaultDecision {
                deny_without_requirement: policy.deny_without_requirement,
            })
    }

    pub fn then(mut self, check: impl AccessCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn evaluate(&self, actor: &Actor, requirement: &Requirement) -> Result<(), AccessError> {
        for check in &self.checks {
            match check.evaluate(actor, requirement) {
                Verdict::Grant => return Ok(()),
                Verdict::Deny(err) => return Err(err),
                Verdict::Abstain => {}
            }
        }
        Err(AccessError::Forbidden(Denial::NoDecision))
    }
}

impl core::fmt::Debug for CheckChain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
