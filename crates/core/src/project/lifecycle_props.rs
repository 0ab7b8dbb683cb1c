//! Property-based tests for the project lifecycle.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::project::lifecycle::{
    LifecycleError, ProjectDates, ProjectStatus, transition, validate_state,
};

fn arb_status() -> impl Strategy<Value = ProjectStatus> {
    prop_oneof![
        Just(ProjectStatus::Pending),
        Just(ProjectStatus::Ongoing),
        Just(ProjectStatus::Completed),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|base| base.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

fn arb_dates() -> impl Strategy<Value = ProjectDates> {
    (
        proptest::option::of(arb_date()),
        proptest::option::of(arb_date()),
    )
        .prop_map(|(start, end)| ProjectDates::new(start, end))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any state accepted by validate_state satisfies all three invariants.
    #[test]
    fn prop_accepted_states_hold_invariants(status in arb_status(), dates in arb_dates()) {
        if validate_state(status, dates).is_ok() {
            if dates.start_date.is_some() {
                prop_assert_ne!(status, ProjectStatus::Pending);
            }
            if dates.end_date.is_some() {
                prop_assert_eq!(status, ProjectStatus::Completed);
            }
            if let (Some(start), Some(end)) = (dates.start_date, dates.end_date) {
                prop_assert!(end >= start);
            }
        }
    }

    /// Pending with a start date is always rejected.
    #[test]
    fn prop_pending_with_start_rejected(start in arb_date()) {
        let result = validate_state(ProjectStatus::Pending, ProjectDates::new(Some(start), None));
        prop_assert_eq!(result, Err(LifecycleError::StartDateWhilePending));
    }

    /// Completed with end strictly before start is always rejected.
    #[test]
    fn prop_completed_end_before_start_rejected(start in arb_date(), gap in 1u64..365) {
        let end = start.checked_sub_days(Days::new(gap)).unwrap();
        let result = validate_state(ProjectStatus::Completed, ProjectDates::new(Some(start), Some(end)));
        prop_assert!(matches!(result, Err(LifecycleError::EndBeforeStart { .. })), "expected EndBeforeStart");
    }

    /// transition never returns a status earlier than the current one.
    #[test]
    fn prop_transition_is_monotonic(current in arb_status(), next in arb_status(), dates in arb_dates()) {
        match transition(current, next, dates) {
            Ok(status) => {
                prop_assert_eq!(status, next);
                prop_assert!(status >= current);
            }
            Err(LifecycleError::InvalidTransition { from, to }) => {
                prop_assert_eq!(from, current);
                prop_assert_eq!(to, next);
                prop_assert!(next < current);
            }
            Err(_) => prop_assert!(validate_state(next, dates).is_err()),
        }
    }
}
