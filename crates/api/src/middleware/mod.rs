//! HTTP middleware.

pub mod auth;

pub use auth::{AuthUser, Principal, authorize};
