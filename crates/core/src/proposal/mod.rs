//! Proposal financial engine.
//!
//! This module implements the pricing rules for plantation project proposals.
//!
//! # Modules
//!
//! - `types` - Project types, payment modes and the computed payment plan
//! - `error` - Proposal-specific error types
//! - `plan` - Allowed durations, discount and installment calculation

pub mod error;
pub mod plan;
pub mod types;

#[cfg(test)]
mod plan_props;

pub use error::PlanError;
pub use plan::{
    FULL_PAYMENT_DISCOUNT_PERCENT, MAX_DURATION_YEARS, PreparedProposal, allowed_durations,
    calculate_installments, parse_amount, parse_years, prepare_proposal,
};
pub use types::{InstallmentSchedule, PaymentMode, PaymentPlan, ProjectType};
