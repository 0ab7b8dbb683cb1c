//! Proposal error types.

use thiserror::Error;

use crate::proposal::types::ProjectType;

/// Errors raised while pricing or preparing a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Project value is missing or not a number.
    #[error("Project value is required and must be numeric")]
    InvalidValue,

    /// Project value is zero or negative.
    #[error("Project value must be greater than zero")]
    NonPositiveValue,

    /// Project value has fractions of a cent.
    #[error("Project value must have at most 2 decimal places")]
    SubCentValue,

    /// Duration is missing, not an integer, or outside the supported range.
    #[error("Project duration is required and must be a positive whole number of years")]
    InvalidDuration,

    /// Payment mode is not one of the supported modes.
    #[error("Payment mode must be 'full' or 'installments'")]
    InvalidPaymentMode,

    /// Project type is not one of the supported types.
    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    /// Duration is not offered for this project type.
    #[error("Duration of {duration} years is not offered for {project_type} projects (allowed: {allowed:?})")]
    DurationNotOffered {
        /// The project type.
        project_type: ProjectType,
        /// The requested duration.
        duration: u32,
        /// Durations offered for the project type.
        allowed: &'static [u32],
    },
}
