//! Proposal domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::proposal::error::PlanError;

/// Crop a plantation project is planned around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    /// Agarwood (resin-producing trees).
    Agarwood,
    /// Sandalwood.
    Sandalwood,
    /// Vanilla vines.
    Vanilla,
    /// Any other crop.
    Other,
}

impl ProjectType {
    /// Returns the string representation of the project type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agarwood => "Agarwood",
            Self::Sandalwood => "Sandalwood",
            Self::Vanilla => "Vanilla",
            Self::Other => "Other",
        }
    }

    /// Parses a project type, treating anything unrecognised as `Other`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Other)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agarwood" => Ok(Self::Agarwood),
            "sandalwood" => Ok(Self::Sandalwood),
            "vanilla" => Ok(Self::Vanilla),
            "other" => Ok(Self::Other),
            _ => Err(PlanError::UnknownProjectType(s.to_string())),
        }
    }
}

/// How the customer pays for the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Lump sum up front, discounted.
    Full,
    /// Equal monthly installments over the project duration.
    Installments,
}

impl PaymentMode {
    /// Returns the string representation of the payment mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Installments => "installments",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "installments" | "installment" => Ok(Self::Installments),
            _ => Err(PlanError::InvalidPaymentMode),
        }
    }
}

/// Monthly installment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    /// Number of monthly payments.
    pub count: u32,
    /// Amount of each payment, rounded to 2 decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Computed price of a proposal under a payment mode.
///
/// Amounts go out as JSON numbers, unlike stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    /// Project value before any discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub original_amount: Decimal,
    /// Discount applied, in whole percent.
    pub discount_percentage: u32,
    /// Discount amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    /// Amount payable after discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    /// Installment schedule; `None` for full payment.
    pub installments: Option<InstallmentSchedule>,
}

impl PaymentPlan {
    /// Returns the payment mode this plan was computed for.
    #[must_use]
    pub const fn mode(&self) -> PaymentMode {
        if self.installments.is_some() {
            PaymentMode::Installments
        } else {
            PaymentMode::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Agarwood", ProjectType::Agarwood)]
    #[case("sandalwood", ProjectType::Sandalwood)]
    #[case(" VANILLA ", ProjectType::Vanilla)]
    #[case("Other", ProjectType::Other)]
    fn test_parse_project_type(#[case] input: &str, #[case] expected: ProjectType) {
        assert_eq!(input.parse::<ProjectType>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_project_type() {
        assert_eq!(
            "Cinnamon".parse::<ProjectType>(),
            Err(PlanError::UnknownProjectType("Cinnamon".to_string()))
        );
        assert_eq!(ProjectType::parse_lenient("Cinnamon"), ProjectType::Other);
    }

    #[rstest]
    #[case("full", PaymentMode::Full)]
    #[case("Full", PaymentMode::Full)]
    #[case("installments", PaymentMode::Installments)]
    #[case("installment", PaymentMode::Installments)]
    fn test_parse_payment_mode(#[case] input: &str, #[case] expected: PaymentMode) {
        assert_eq!(input.parse::<PaymentMode>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_payment_mode() {
        assert_eq!(
            "monthly".parse::<PaymentMode>(),
            Err(PlanError::InvalidPaymentMode)
        );
    }

    #[test]
    fn test_payment_plan_serializes_camel_case() {
        let plan = PaymentPlan {
            original_amount: Decimal::new(100_000, 2),
            discount_percentage: 10,
            discount_amount: Decimal::new(10_000, 2),
            final_amount: Decimal::new(90_000, 2),
            installments: None,
        };

        let json = serde_json::to_value(plan).unwrap();
        assert!(json.get("originalAmount").is_some());
        assert!(json.get("discountPercentage").is_some());
        assert!(json.get("finalAmount").is_some());
        assert!(json["installments"].is_null());
    }

    #[test]
    fn test_payment_plan_amounts_are_numbers() {
        let plan = PaymentPlan {
            original_amount: Decimal::new(1_000, 0),
            discount_percentage: 0,
            discount_amount: Decimal::ZERO,
            final_amount: Decimal::new(1_000, 0),
            installments: Some(InstallmentSchedule {
                count: 48,
                amount: Decimal::new(2_083, 2),
            }),
        };

        let json = serde_json::to_value(plan).unwrap();
        assert_eq!(json["originalAmount"], serde_json::json!(1000.0));
        assert_eq!(json["finalAmount"], serde_json::json!(1000.0));
        assert_eq!(json["discountAmount"], serde_json::json!(0.0));
        assert_eq!(json["installments"]["amount"], serde_json::json!(20.83));
        assert_eq!(json["installments"]["count"], 48);
    }
}
