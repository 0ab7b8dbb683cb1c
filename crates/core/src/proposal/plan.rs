//! Allowed durations and payment plan calculation.
//!
//! All arithmetic is done in `Decimal`; every monetary output is rounded to
//! 2 decimal places, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

use crate::proposal::error::PlanError;
use crate::proposal::types::{InstallmentSchedule, PaymentMode, PaymentPlan, ProjectType};

/// Discount granted for paying the full value up front, in percent.
pub const FULL_PAYMENT_DISCOUNT_PERCENT: u32 = 10;

/// Longest project duration accepted by the calculator, in years.
pub const MAX_DURATION_YEARS: u32 = 100;

const MONTHS_PER_YEAR: u32 = 12;

const MONEY_SCALE: u32 = 2;

const AGARWOOD_DURATIONS: &[u32] = &[4, 8];
const SANDALWOOD_DURATIONS: &[u32] = &[3, 6, 9, 12, 15];
const VANILLA_DURATIONS: &[u32] = &[3, 5, 7, 9, 11];
const DEFAULT_DURATIONS: &[u32] = &[1, 2, 3, 4, 5];

/// Durations (in years) offered for a project type.
#[must_use]
pub const fn allowed_durations(project_type: ProjectType) -> &'static [u32] {
    match project_type {
        ProjectType::Agarwood => AGARWOOD_DURATIONS,
        ProjectType::Sandalwood => SANDALWOOD_DURATIONS,
        ProjectType::Vanilla => VANILLA_DURATIONS,
        ProjectType::Other => DEFAULT_DURATIONS,
    }
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the payment plan for a project value paid under `mode`.
///
/// # Errors
///
/// Returns `PlanError::NonPositiveValue` if `value <= 0`,
/// `PlanError::SubCentValue` if `value` has more than 2 decimal places and
/// `PlanError::InvalidDuration` if `duration_years` is zero or above
/// [`MAX_DURATION_YEARS`].
pub fn calculate_installments(
    value: Decimal,
    duration_years: u32,
    mode: PaymentMode,
) -> Result<PaymentPlan, PlanError> {
    if value <= Decimal::ZERO {
        return Err(PlanError::NonPositiveValue);
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(PlanError::SubCentValue);
    }
    if duration_years == 0 || duration_years > MAX_DURATION_YEARS {
        return Err(PlanError::InvalidDuration);
    }

    let original_amount = value;

    match mode {
        PaymentMode::Full => {
            let rate = Decimal::from(FULL_PAYMENT_DISCOUNT_PERCENT) / Decimal::ONE_HUNDRED;
            let discount_amount = round_money(original_amount * rate);
            Ok(PaymentPlan {
                original_amount,
                discount_percentage: FULL_PAYMENT_DISCOUNT_PERCENT,
                discount_amount,
                final_amount: original_amount - discount_amount,
                installments: None,
            })
        }
        PaymentMode::Installments => {
            let count = duration_years * MONTHS_PER_YEAR;
            let amount = round_money(original_amount / Decimal::from(count));
            Ok(PaymentPlan {
                original_amount,
                discount_percentage: 0,
                discount_amount: Decimal::ZERO,
                final_amount: original_amount,
                installments: Some(InstallmentSchedule { count, amount }),
            })
        }
    }
}

/// Reads a monetary amount from a JSON number or numeric string.
#[must_use]
pub fn parse_amount(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Reads a whole number of years from a JSON number or numeric string.
#[must_use]
pub fn parse_years(raw: &Value) -> Option<u32> {
    match raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                // Accept integral floats such as `5.0`.
                let amount = parse_amount(raw)?;
                if amount.fract().is_zero() && amount.is_sign_positive() {
                    u64::try_from(amount.trunc().mantissa()).ok()
                } else {
                    None
                }
            })
            .and_then(|years| u32::try_from(years).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A validated proposal ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedProposal {
    /// Project type.
    pub project_type: ProjectType,
    /// Duration in years, one of [`allowed_durations`].
    pub duration_years: u32,
    /// Chosen payment mode.
    pub payment_mode: PaymentMode,
    /// Computed plan.
    pub plan: PaymentPlan,
}

impl PreparedProposal {
    /// Installment count; `None` for full payment.
    #[must_use]
    pub fn installment_count(&self) -> Option<u32> {
        self.plan.installments.map(|s| s.count)
    }

    /// Installment amount; `None` for full payment.
    #[must_use]
    pub fn installment_amount(&self) -> Option<Decimal> {
        self.plan.installments.map(|s| s.amount)
    }
}

/// Validates proposal inputs and computes the plan to store with them.
///
/// Unlike the public calculator, this also requires the duration to be one
/// offered for the project type.
///
/// # Errors
///
/// Returns `PlanError::DurationNotOffered` for a duration outside
/// [`allowed_durations`], plus any error of [`calculate_installments`].
pub fn prepare_proposal(
    project_type: ProjectType,
    duration_years: u32,
    value: Decimal,
    payment_mode: PaymentMode,
) -> Result<PreparedProposal, PlanError> {
    let allowed = allowed_durations(project_type);
    if !allowed.contains(&duration_years) {
        return Err(PlanError::DurationNotOffered {
            project_type,
            duration: duration_years,
            allowed,
        });
    }

    let plan = calculate_installments(value, duration_years, payment_mode)?;

    Ok(PreparedProposal {
        project_type,
        duration_years,
        payment_mode,
        plan,
    })
}
