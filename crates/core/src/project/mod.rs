//! Project lifecycle management.
//!
//! A project moves forward through `Pending → Ongoing → Completed`. Status
//! and dates are validated together: a write either leaves the record in a
//! consistent state or is rejected as a whole.
//!
//! # Modules
//!
//! - `lifecycle` - Status enum, date invariants and the transition function

pub mod lifecycle;

#[cfg(test)]
mod lifecycle_props;

pub use lifecycle::{LifecycleError, ProjectDates, ProjectStatus, transition, validate_state};
