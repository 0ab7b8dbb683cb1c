//! Property-based tests for the payment plan calculator.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::proposal::plan::{allowed_durations, calculate_installments, prepare_proposal};
use crate::proposal::types::{PaymentMode, ProjectType};

/// Positive amounts with up to 2 decimal places, 0.01 ..= 100,000,000.00.
fn arb_value() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_years() -> impl Strategy<Value = u32> {
    1u32..=50
}

fn arb_project_type() -> impl Strategy<Value = ProjectType> {
    prop_oneof![
        Just(ProjectType::Agarwood),
        Just(ProjectType::Sandalwood),
        Just(ProjectType::Vanilla),
        Just(ProjectType::Other),
    ]
}

fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Full payment: final = round(v * 0.9), discount = round(v * 0.1), and they sum to v.
    #[test]
    fn prop_full_payment_discount(value in arb_value(), years in arb_years()) {
        let plan = calculate_installments(value, years, PaymentMode::Full).unwrap();

        prop_assert_eq!(plan.discount_amount, round2(value * Decimal::new(1, 1)));
        let expected_final = round2(value * Decimal::new(9, 1));
        prop_assert!((plan.final_amount - expected_final).abs() <= Decimal::new(1, 2));
        prop_assert_eq!(plan.discount_amount + plan.final_amount, value);
        prop_assert!(plan.installments.is_none());
    }

    /// Installments: count = years * 12 and count * amount stays within count cents of v.
    #[test]
    fn prop_installment_slack(value in arb_value(), years in arb_years()) {
        let plan = calculate_installments(value, years, PaymentMode::Installments).unwrap();
        let schedule = plan.installments.unwrap();

        prop_assert_eq!(schedule.count, years * 12);
        let total = Decimal::from(schedule.count) * schedule.amount;
        let slack = Decimal::from(schedule.count) * Decimal::new(1, 2);
        prop_assert!((total - value).abs() < slack);
        prop_assert_eq!(plan.final_amount, value);
        prop_assert_eq!(plan.discount_amount, Decimal::ZERO);
    }

    /// The duration table is a pure function: repeated calls agree.
    #[test]
    fn prop_allowed_durations_idempotent(project_type in arb_project_type()) {
        let first = allowed_durations(project_type).to_vec();
        for _ in 0..3 {
            prop_assert_eq!(allowed_durations(project_type), first.as_slice());
        }
    }

    /// Preparation succeeds exactly for offered durations.
    #[test]
    fn prop_prepare_matches_table(
        project_type in arb_project_type(),
        years in arb_years(),
        value in arb_value(),
    ) {
        let offered = allowed_durations(project_type).contains(&years);
        let result = prepare_proposal(project_type, years, value, PaymentMode::Full);
        prop_assert_eq!(result.is_ok(), offered);
    }
}

#[test]
fn agarwood_durations_are_stable() {
    for _ in 0..10 {
        assert_eq!(allowed_durations(ProjectType::Agarwood), &[4, 8]);
    }
}
