//! HTTP adapter: tenant resolution, session extraction, access guards, and
//! the routes that exercise them.

pub mod app;
pub mod authz;
pub mod config;
pub mod middleware;
