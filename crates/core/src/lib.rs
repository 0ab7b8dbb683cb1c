//! Core business logic for Plantara.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and account roles
//! - `proposal` - Allowed durations and payment plan calculation
//! - `project` - Project status lifecycle and date invariants
//! - `inventory` - Stock arithmetic and item-name normalization
//! - `validation` - Format rules for names, phones, NIC numbers and emails

pub mod auth;
pub mod inventory;
pub mod project;
pub mod proposal;
pub mod validation;
