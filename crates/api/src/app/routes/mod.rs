use axum::{Router, routing::get};

pub mod admin;
pub mod staff;
pub mod system;

/// Permission names used by the routes.
pub mod perms {
    use campus_auth::Permission;

    pub const VIEW_STAFF: Permission = Permission::from_static("hr.view_staff");
    pub const VIEW_PAYSLIP: Permission = Permission::from_static("finance.view_payslip");
}

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/staff", staff::router())
        .nest("/admin", admin::router())
}
