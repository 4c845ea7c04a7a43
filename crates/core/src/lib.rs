//! `campus-core`: shared primitives for the school-management platform.
//!
//! Identifiers, the domain error type, and the contract every tenant-scoped
//! record implements. No IO, no framework types.

pub mod error;
pub mod id;
pub mod resource;

pub use error::{DomainError, DomainResult};
pub use id::{ResourceId, TenantId, UserId};
pub use resource::TenantOwned;
