//! Shared types, errors, and configuration for Plantara.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Session token claims and the JWT issuer/verifier
//! - Outbound mail for account notifications
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod jwt_tests;

pub use auth::{Claims, IssuedToken};
pub use config::{AppConfig, EmailConfig};
pub use email::{EmailError, EmailService, WelcomeRecipient};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
