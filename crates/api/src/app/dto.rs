use serde::Serialize;
use serde_json::{Value, json};

use campus_core::{ResourceId, TenantId, TenantOwned, UserId};

/// A member of staff on a school's HR register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffRecord {
    pub id: ResourceId,
    pub tenant_id: TenantId,
    /// The staff member's own login, if they have one.
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub designation: String,
    pub department: String,
    pub monthly_salary_cents: u64,
    pub created_by: Option<UserId>,
}

impl TenantOwned for StaffRecord {
    fn resource_id(&self) -> ResourceId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn owner_id(&self) -> Option<UserId> {
        self.user_id
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

pub fn staff_summary(s: &StaffRecord) -> Value {
    json!({
        "id": s.id.to_string(),
        "full_name": s.full_name,
        "designation": s.designation,
    })
}

pub fn staff_detail(s: &StaffRecord) -> Value {
    json!({
        "id": s.id.to_string(),
        "full_name": s.full_name,
        "designation": s.designation,
        "department": s.department,
        "user_id": s.user_id.map(|u| u.to_string()),
    })
}

pub fn payslip(s: &StaffRecord) -> Value {
    json!({
        "staff_id": s.id.to_string(),
        "full_name": s.full_name,
        "monthly_salary_cents": s.monthly_salary_cents,
    })
}
