use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::{TenantId, TenantOwned};
use campus_tenancy::{TenantFilter, TenantStore, current_tenant_id};

use crate::{Actor, CheckChain, Permission, Principal, Requirement, Role, RoleHierarchy};

/// Why a request was refused.
///
/// `NotFound` is also what object-level denials report, so callers cannot
/// tell "hidden from you" apart from "does not exist".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(Denial),

    #[error("not found")]
    NotFound,
}

/// Which part of a declared requirement failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denial {
    #[error("role '{actual}' does not satisfy all of {required:?}")]
    MissingRole { required: Vec<Role>, actual: Role },

    #[error("role '{actual}' is not one of {required:?}")]
    MissingAnyRole { required: Vec<Role>, actual: Role },

    #[error("role level {actual} is below the required {required}")]
    BelowMinimumLevel { required: u32, actual: u32 },

    #[error("missing permission '{0}'")]
    MissingPermission(Permission),

    #[error("missing every one of {0:?}")]
    MissingAnyPermission(Vec<Permission>),

    #[error("handler declares no requirement")]
    NoRequirement,

    #[error("no check reached a decision")]
    NoDecision,
}

/// Deployment-level authorization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    pub hierarchy: RoleHierarchy,
    /// Refuse handlers that declare no requirement (fail closed).
    pub deny_without_requirement: bool,
    /// Let superusers list every tenant's rows.
    pub superuser_sees_all_tenants: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            hierarchy: RoleHierarchy::default(),
            deny_without_requirement: false,
            superuser_sees_all_tenants: true,
        }
    }
}

/// How single-record access is checked after the record is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPolicy {
    pub allow_superuser: bool,
    /// Require the principal to own or have created the record.
    pub check_ownership: bool,
    /// Object-level grant that stands in for ownership.
    pub object_permission: Option<Permission>,
}

impl Default for ObjectPolicy {
    fn default() -> Self {
        Self::tenant_only()
    }
}

impl ObjectPolicy {
    /// Same-tenant is enough.
    pub fn tenant_only() -> Self {
        Self {
            allow_superuser: true,
            check_ownership: false,
            object_permission: None,
        }
    }

    /// Same tenant and owned (or created) by the principal.
    pub fn owned() -> Self {
        Self {
            check_ownership: true,
            ..Self::tenant_only()
        }
    }

    /// Same tenant and owned, or explicitly granted `permission` on the record.
    pub fn owned_or_granted(permission: impl Into<Permission>) -> Self {
        Self {
            object_permission: Some(permission.into()),
            ..Self::owned()
        }
    }
}

/// Decides whether an actor may proceed and what rows it may see.
///
/// Reads principal claims and the tenant context; never mutates either.
#[derive(Debug)]
pub struct AccessEvaluator {
    policy: AccessPolicy,
    chain: CheckChain,
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}

impl AccessEvaluator {
    pub fn new(policy: AccessPolicy) -> Self {
        let chain = CheckChain::standard(&policy);
        Self::with_chain(policy, chain)
    }

    /// Use a custom chain (e.g. with an extra domain check spliced in).
    pub fn with_chain(policy: AccessPolicy, chain: CheckChain) -> Self {
        Self { policy, chain }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.policy.hierarchy
    }

    /// Gate a handler on its declared requirement.
    pub fn authorize(&self, actor: &Actor, requirement: &Requirement) -> Result<(), AccessError> {
        self.chain.evaluate(actor, requirement)
    }

    /// Row constraint for the active tenant, using the policy's superuser setting.
    pub fn tenant_filter(&self, actor: &Actor) -> TenantFilter {
        self.tenant_filter_with(actor, self.policy.superuser_sees_all_tenants)
    }

    pub fn tenant_filter_with(&self, actor: &Actor, allow_superuser: bool) -> TenantFilter {
        tenant_filter_for(actor, current_tenant_id(), allow_superuser)
    }

    /// Authorize, then list only the rows the actor's tenant owns.
    pub fn scoped_list<V, S>(
        &self,
        actor: &Actor,
        requirement: &Requirement,
        store: &S,
    ) -> Result<Vec<V>, AccessError>
    where
        S: TenantStore<V> + ?Sized,
    {
        self.authorize(actor, requirement)?;
        Ok(store.list(&self.tenant_filter(actor)))
    }

    /// Check a fetched record. Absent, cross-tenant and not-owned records
    /// are all reported as [`AccessError::NotFound`].
    pub fn authorize_object<'r, R>(
        &self,
        actor: &Actor,
        resource: Option<&'r R>,
        policy: &ObjectPolicy,
    ) -> Result<&'r R, AccessError>
    where
        R: TenantOwned + ?Sized,
    {
        let principal = actor.principal().ok_or(AccessError::Unauthenticated)?;
        let resource = resource.ok_or(AccessError::NotFound)?;

        if principal.is_superuser() && policy.allow_superuser {
            return Ok(resource);
        }

        if !self
            .tenant_filter_with(actor, policy.allow_superuser)
            .matches(resource.tenant_id())
        {
            return Err(AccessError::NotFound);
        }

        if principal.is_superuser() || !policy.check_ownership {
            return Ok(resource);
        }

        let granted = policy
            .object_permission
            .as_ref()
            .is_some_and(|perm| principal.has_object_perm(perm, resource.resource_id()));

        if owns(principal, resource) || granted {
            Ok(resource)
        } else {
            Err(AccessError::NotFound)
        }
    }
}

fn owns<R: TenantOwned + ?Sized>(principal: &Principal, resource: &R) -> bool {
    let me = Some(principal.user_id());
    resource.owner_id() == me || resource.created_by() == me
}

/// Row constraint for `actor` given the tenant active in its context.
///
/// An empty context, or a principal whose own tenant differs from the active
/// one, yields [`TenantFilter::Nothing`]. Superusers see everything only when
/// `allow_superuser` is set; otherwise they are pinned to the active tenant.
pub fn tenant_filter_for(
    actor: &Actor,
    current: Option<TenantId>,
    allow_superuser: bool,
) -> TenantFilter {
    let Some(principal) = actor.principal() else {
        return TenantFilter::Nothing;
    };

    if principal.is_superuser() && allow_superuser {
        return TenantFilter::AllTenants;
    }

    match current {
        Some(active) if principal.is_superuser() || principal.tenant_id() == Some(active) => {
            TenantFilter::Only(active)
        }
        _ => TenantFilter::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{ResourceId, UserId};
    use campus_tenancy::{InMemoryTenantStore, Tenant, with_tenant};
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct StaffRecord {
        id: ResourceId,
        tenant: TenantId,
        user: Option<UserId>,
        created_by: Option<UserId>,
    }

    impl TenantOwned for StaffRecord {
        fn resource_id(&self) -> ResourceId {
            self.id
        }

        fn tenant_id(&self) -> TenantId {
            self.tenant
        }

        fn owner_id(&self) -> Option<UserId> {
            self.user
        }

        fn created_by(&self) -> Option<UserId> {
            self.created_by
        }
    }

    fn record(tenant: TenantId, user: Option<UserId>) -> StaffRecord {
        StaffRecord {
            id: ResourceId::new(),
            tenant,
            user,
            created_by: None,
        }
    }

    fn tenant(slug: &str) -> Tenant {
        Tenant::new(slug, slug).unwrap()
    }

    fn member(tenant: TenantId, role: Role) -> Principal {
        Principal::member(UserId::new(), tenant, role)
    }

    fn evaluator() -> AccessEvaluator {
        AccessEvaluator::default()
    }

    fn forbidden(result: Result<(), AccessError>) -> bool {
        matches!(result, Err(AccessError::Forbidden(_)))
    }

    #[test]
    fn anonymous_is_unauthenticated_even_without_requirement() {
        let ev = evaluator();
        assert_eq!(
            ev.authorize(&Actor::Anonymous, &Requirement::new()),
            Err(AccessError::Unauthenticated)
        );
        assert_eq!(
            ev.authorize(&Actor::Anonymous, &Requirement::permission("hr.view_staff")),
            Err(AccessError::Unauthenticated)
        );
    }

    #[test]
    fn authenticated_without_requirement_is_allowed() {
        let actor = member(TenantId::new(), Role::GUARDIAN).into();
        assert_eq!(evaluator().authorize(&actor, &Requirement::new()), Ok(()));
    }

    #[test]
    fn fail_closed_policy_refuses_empty_requirement() {
        let ev = AccessEvaluator::new(AccessPolicy {
            deny_without_requirement: true,
            ..AccessPolicy::default()
        });
        let actor: Actor = member(TenantId::new(), Role::ADMIN).into();
        assert_eq!(
            ev.authorize(&actor, &Requirement::new()),
            Err(AccessError::Forbidden(Denial::NoRequirement))
        );
        assert_eq!(ev.authorize(&actor, &Requirement::new().with_min_level(0)), Ok(()));

        let root: Actor = Principal::superuser(UserId::new(), None).into();
        assert_eq!(ev.authorize(&root, &Requirement::new()), Ok(()));
    }

    #[test]
    fn single_permission() {
        let ev = evaluator();
        let t = TenantId::new();
        let with: Actor = member(t, Role::STAFF).with_permission("hr.view_staff").into();
        let without: Actor = member(t, Role::STAFF).into();
        let req = Requirement::permission("hr.view_staff");

        assert_eq!(ev.authorize(&with, &req), Ok(()));
        assert_eq!(
            ev.authorize(&without, &req),
            Err(AccessError::Forbidden(Denial::MissingPermission("hr.view_staff".into())))
        );
    }

    #[test]
    fn permission_list_needs_all() {
        let ev = evaluator();
        let t = TenantId::new();
        let req =
            Requirement::permission("finance.view_invoice").with_permission("finance.add_invoice");

        let partial: Actor = member(t, Role::STAFF).with_permission("finance.view_invoice").into();
        let full: Actor = member(t, Role::STAFF)
            .with_permissions(["finance.view_invoice", "finance.add_invoice"])
            .into();

        assert!(forbidden(ev.authorize(&partial, &req)));
        assert_eq!(ev.authorize(&full, &req), Ok(()));
    }

    #[test]
    fn permission_any_needs_one() {
        let ev = evaluator();
        let t = TenantId::new();
        let req = Requirement::new().with_any_permission([
            "admission.view_application",
            "admission.change_application",
        ]);

        let one: Actor = member(t, Role::TEACHER)
            .with_permission("admission.change_application")
            .into();
        let none: Actor = member(t, Role::TEACHER).with_permission("hr.view_staff").into();

        assert_eq!(ev.authorize(&one, &req), Ok(()));
        assert!(forbidden(ev.authorize(&none, &req)));
    }

    #[test]
    fn role_any_and_role_all() {
        let ev = evaluator();
        let t = TenantId::new();
        let teacher: Actor = member(t, Role::TEACHER).into();

        let any = Requirement::new().with_any_role([Role::ADMIN, Role::TEACHER]);
        assert_eq!(ev.authorize(&teacher, &any), Ok(()));

        let all = Requirement::new().with_role(Role::ADMIN).with_role(Role::TEACHER);
        assert!(forbidden(ev.authorize(&teacher, &all)));
    }

    #[test]
    fn role_gate_runs_before_permission_gate() {
        let ev = evaluator();
        let actor: Actor = member(TenantId::new(), Role::STAFF)
            .with_permission("finance.view_invoice")
            .into();
        let req = Requirement::permission("finance.view_invoice").with_role(Role::ADMIN);

        let err = ev.authorize(&actor, &req).unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(Denial::MissingRole { .. })));
    }

    #[test]
    fn passing_role_gate_still_checks_permissions() {
        let ev = evaluator();
        let actor: Actor = member(TenantId::new(), Role::ADMIN).into();
        let req = Requirement::permission("finance.view_invoice").with_role(Role::ADMIN);
        assert_eq!(
            ev.authorize(&actor, &req),
            Err(AccessError::Forbidden(Denial::MissingPermission("finance.view_invoice".into())))
        );
    }

    #[test]
    fn min_level_uses_hierarchy() {
        let ev = evaluator();
        let t = TenantId::new();
        let admin_level = ev.hierarchy().level(&Role::ADMIN);
        let req = Requirement::new().with_min_level(admin_level);

        assert_eq!(ev.authorize(&member(t, Role::ADMIN).into(), &req), Ok(()));
        assert_eq!(ev.authorize(&member(t, Role::SUPER_ADMIN).into(), &req), Ok(()));
        assert_eq!(
            ev.authorize(&member(t, Role::TEACHER).into(), &req),
            Err(AccessError::Forbidden(Denial::BelowMinimumLevel {
                required: 80,
                actual: 40
            }))
        );
        assert!(forbidden(ev.authorize(&member(t, Role::new("janitor")).into(), &req)));
    }

    #[test]
    fn superuser_bypasses_role_and_permission() {
        let ev = evaluator();
        let root: Actor = Principal::superuser(UserId::new(), None).into();
        let req = Requirement::permission("hr.delete_staff")
            .with_role(Role::GUARDIAN)
            .with_min_level(1_000);
        assert_eq!(ev.authorize(&root, &req), Ok(()));
    }

    #[test]
    fn staff_list_sees_only_own_tenant() {
        let ev = evaluator();
        let (t1, t2) = (tenant("alpha"), tenant("beta"));
        let store = InMemoryTenantStore::new();
        let r1 = record(t1.id, None);
        let r2 = record(t2.id, None);
        store.insert(r1.clone()).unwrap();
        store.insert(r2).unwrap();

        let actor: Actor = member(t1.id, Role::STAFF).with_permission("view_x").into();
        let req = Requirement::permission("view_x");

        let listed = with_tenant(Some(t1), || ev.scoped_list(&actor, &req, &store)).unwrap();
        assert_eq!(listed, vec![r1]);
    }

    #[test]
    fn list_without_context_is_empty() {
        let ev = evaluator();
        let t1 = tenant("alpha");
        let store = InMemoryTenantStore::new();
        store.insert(record(t1.id, None)).unwrap();

        let actor: Actor = member(t1.id, Role::STAFF).into();
        let listed =
            with_tenant(None, || ev.scoped_list(&actor, &Requirement::new(), &store)).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn list_on_foreign_tenant_context_is_empty() {
        let ev = evaluator();
        let (t1, t2) = (tenant("alpha"), tenant("beta"));
        let store = InMemoryTenantStore::new();
        store.insert(record(t1.id, None)).unwrap();
        store.insert(record(t2.id, None)).unwrap();

        let actor: Actor = member(t1.id, Role::STAFF).into();
        let listed = with_tenant(Some(t2), || {
            ev.scoped_list(&actor, &Requirement::new(), &store)
        })
        .unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn list_is_refused_before_touching_the_store() {
        let ev = evaluator();
        let t1 = tenant("alpha");
        let store: InMemoryTenantStore<StaffRecord> = InMemoryTenantStore::new();
        let actor: Actor = member(t1.id, Role::STAFF).into();

        let result = with_tenant(Some(t1), || {
            ev.scoped_list(&actor, &Requirement::permission("hr.view_staff"), &store)
        });
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[test]
    fn superuser_listing_spans_tenants_unless_pinned() {
        let (t1, t2) = (tenant("alpha"), tenant("beta"));
        let store = InMemoryTenantStore::new();
        store.insert(record(t1.id, None)).unwrap();
        store.insert(record(t2.id, None)).unwrap();
        let root: Actor = Principal::superuser(UserId::new(), None).into();

        let ev = evaluator();
        let all = with_tenant(Some(t1.clone()), || {
            ev.scoped_list(&root, &Requirement::new(), &store)
        })
        .unwrap();
        assert_eq!(all.len(), 2);

        let pinned = AccessEvaluator::new(AccessPolicy {
            superuser_sees_all_tenants: false,
            ..AccessPolicy::default()
        });
        let one = with_tenant(Some(t1.clone()), || {
            pinned.scoped_list(&root, &Requirement::new(), &store)
        })
        .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].tenant, t1.id);
    }

    #[test]
    fn object_of_same_tenant_is_returned() {
        let ev = evaluator();
        let t1 = tenant("alpha");
        let actor: Actor = member(t1.id, Role::STAFF).into();
        let row = record(t1.id, None);

        let got = with_tenant(Some(t1), || {
            ev.authorize_object(&actor, Some(&row), &ObjectPolicy::tenant_only()).cloned()
        });
        assert_eq!(got, Ok(row));
    }

    #[test]
    fn cross_tenant_object_looks_missing() {
        let ev = evaluator();
        let (t1, t2) = (tenant("alpha"), tenant("beta"));
        let actor: Actor = member(t1.id, Role::ADMIN).into();
        let foreign = record(t2.id, None);

        let result = with_tenant(Some(t1), || {
            ev.authorize_object(&actor, Some(&foreign), &ObjectPolicy::tenant_only()).map(|_| ())
        });
        assert_eq!(result, Err(AccessError::NotFound));
    }

    #[test]
    fn someone_elses_object_is_indistinguishable_from_absent() {
        let ev = evaluator();
        let t = tenant("alpha");
        let p1 = member(t.id, Role::STAFF);
        let p2 = member(t.id, Role::STAFF);
        let owned_by_p2 = record(t.id, Some(p2.user_id()));
        let actor: Actor = p1.into();
        let policy = ObjectPolicy::owned_or_granted("finance.view_payslip");

        let (hidden, missing) = with_tenant(Some(t), || {
            (
                ev.authorize_object(&actor, Some(&owned_by_p2), &policy).map(|_| ()),
                ev.authorize_object::<StaffRecord>(&actor, None, &policy).map(|_| ()),
            )
        });
        assert_eq!(hidden, Err(AccessError::NotFound));
        assert_eq!(hidden, missing);
    }

    #[test]
    fn owner_creator_and_grantee_may_open_the_object() {
        let ev = evaluator();
        let t = tenant("alpha");
        let owner = member(t.id, Role::STAFF);
        let creator = member(t.id, Role::ADMIN);
        let mut row = record(t.id, Some(owner.user_id()));
        row.created_by = Some(creator.user_id());
        let grantee = member(t.id, Role::STAFF).with_object_grant("finance.view_payslip", row.id);
        let policy = ObjectPolicy::owned_or_granted("finance.view_payslip");

        with_tenant(Some(t), || {
            for p in [owner, creator, grantee] {
                let actor = Actor::from(p);
                assert!(ev.authorize_object(&actor, Some(&row), &policy).is_ok());
            }
        });
    }

    #[test]
    fn grant_for_another_permission_does_not_open_the_object() {
        let ev = evaluator();
        let t = tenant("alpha");
        let row = record(t.id, Some(UserId::new()));
        let actor: Actor = member(t.id, Role::STAFF)
            .with_object_grant("finance.change_payslip", row.id)
            .into();

        let result = with_tenant(Some(t), || {
            let policy = ObjectPolicy::owned_or_granted("finance.view_payslip");
            ev.authorize_object(&actor, Some(&row), &policy).map(|_| ())
        });
        assert_eq!(result, Err(AccessError::NotFound));
    }

    #[test]
    fn superuser_opens_any_object_when_allowed() {
        let ev = evaluator();
        let t2 = tenant("beta");
        let root: Actor = Principal::superuser(UserId::new(), None).into();
        let row = record(t2.id, Some(UserId::new()));

        let open = with_tenant(None, || {
            ev.authorize_object(&root, Some(&row), &ObjectPolicy::owned())
                .is_ok()
        });
        assert!(open);

        let strict = ObjectPolicy {
            allow_superuser: false,
            ..ObjectPolicy::owned()
        };
        let in_t2 = with_tenant(Some(t2.clone()), || {
            ev.authorize_object(&root, Some(&row), &strict).is_ok()
        });
        assert!(in_t2);
        let elsewhere = with_tenant(Some(tenant("gamma")), || {
            ev.authorize_object(&root, Some(&row), &strict).map(|_| ())
        });
        assert_eq!(elsewhere, Err(AccessError::NotFound));
    }

    #[test]
    fn anonymous_object_access_is_unauthenticated() {
        let ev = evaluator();
        let row = record(TenantId::new(), None);
        assert_eq!(
            ev.authorize_object(&Actor::Anonymous, Some(&row), &ObjectPolicy::default())
                .map(|_| ()),
            Err(AccessError::Unauthenticated)
        );
    }

    #[test]
    fn filter_rules() {
        let (t1, t2) = (TenantId::new(), TenantId::new());
        let m: Actor = member(t1, Role::STAFF).into();
        let root: Actor = Principal::superuser(UserId::new(), None).into();

        assert_eq!(tenant_filter_for(&m, Some(t1), true), TenantFilter::Only(t1));
        assert_eq!(tenant_filter_for(&m, Some(t2), true), TenantFilter::Nothing);
        assert_eq!(tenant_filter_for(&m, None, true), TenantFilter::Nothing);
        assert_eq!(tenant_filter_for(&Actor::Anonymous, Some(t1), true), TenantFilter::Nothing);
        assert_eq!(tenant_filter_for(&root, None, true), TenantFilter::AllTenants);
        assert_eq!(tenant_filter_for(&root, Some(t2), false), TenantFilter::Only(t2));
        assert_eq!(tenant_filter_for(&root, None, false), TenantFilter::Nothing);
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: AccessPolicy =
            serde_json::from_str(r#"{ "deny_without_requirement": true }"#).unwrap();
        assert!(policy.deny_without_requirement);
        assert!(policy.superuser_sees_all_tenants);
        assert_eq!(policy.hierarchy, RoleHierarchy::default());
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::SUPER_ADMIN),
            Just(Role::ADMIN),
            Just(Role::STAFF),
            Just(Role::TEACHER),
            Just(Role::STUDENT),
            Just(Role::GUARDIAN),
            "[a-z]{3,8}".prop_map(Role::new),
        ]
    }

    fn any_permission() -> impl Strategy<Value = Permission> {
        "[a-z]{2,6}\\.[a-z]{2,8}".prop_map(Permission::new)
    }

    fn any_requirement() -> impl Strategy<Value = Requirement> {
        (
            prop::collection::vec(any_permission(), 0..3),
            prop::collection::vec(any_permission(), 0..3),
            prop::collection::vec(any_role(), 0..3),
            prop::collection::vec(any_role(), 0..3),
            prop::option::of(0u32..200),
        )
            .prop_map(
                |(permissions, permissions_any, roles, roles_any, min_role_level)| Requirement {
                    permissions,
                    permissions_any,
                    roles,
                    roles_any,
                    min_role_level,
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Superusers pass every declared requirement.
        #[test]
        fn superuser_always_allowed(req in any_requirement(), deny_empty in any::<bool>()) {
            let ev = AccessEvaluator::new(AccessPolicy {
                deny_without_requirement: deny_empty,
                ..AccessPolicy::default()
            });
            let root: Actor = Principal::superuser(UserId::new(), None).into();
            prop_assert_eq!(ev.authorize(&root, &req), Ok(()));
        }

        /// If role A ranks at least as high as role B, A passes any
        /// minimum-level gate B passes.
        #[test]
        fn min_level_is_monotonic(a in any_role(), b in any_role(), min in 0u32..200) {
            let ev = evaluator();
            let h = ev.hierarchy();
            prop_assume!(h.level(&a) >= h.level(&b));
            let req = Requirement::new().with_min_level(min);
            let t = TenantId::new();
            let b_ok = ev.authorize(&member(t, b).into(), &req).is_ok();
            let a_ok = ev.authorize(&member(t, a).into(), &req).is_ok();
            prop_assert!(!b_ok || a_ok);
        }

        /// A role mismatch denies no matter which permissions are held.
        #[test]
        fn role_mismatch_beats_held_permission(
            required in any_role(),
            actual in any_role(),
            perm in any_permission(),
        ) {
            prop_assume!(required != actual);
            let ev = evaluator();
            let actor: Actor = member(TenantId::new(), actual).with_permission(perm.clone()).into();
            let req = Requirement::new().with_role(required).with_permission(perm);
            let is_role_denial = matches!(
                ev.authorize(&actor, &req),
                Err(AccessError::Forbidden(Denial::MissingRole { .. }))
            );
            prop_assert!(is_role_denial);
        }

        /// Non-superusers never receive a row from a tenant other than the active one.
        #[test]
        fn scoped_list_never_crosses_tenants(
            owners in prop::collection::vec(0usize..3, 0..30),
            home in 0usize..3,
            active in 0usize..3,
        ) {
            let tenants: Vec<Tenant> = (0..3).map(|i| tenant(&format!("t{i}"))).collect();
            let store = InMemoryTenantStore::new();
            for o in &owners {
                store.insert(record(tenants[*o].id, None)).unwrap();
            }
            let ev = evaluator();
            let actor: Actor = member(tenants[home].id, Role::STAFF).into();
            let active_id = tenants[active].id;

            let listed = with_tenant(Some(tenants[active].clone()), || {
                ev.scoped_list(&actor, &Requirement::new(), &store)
            }).unwrap();

            prop_assert!(listed.iter().all(|r| r.tenant == active_id));
            if home != active {
                prop_assert!(listed.is_empty());
            }
        }
    }
}
