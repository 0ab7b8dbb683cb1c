//! Project status and date invariants.
//!
//! Invariants checked on every write:
//! - A: `start_date` is set only when the status is Ongoing or Completed
//! - B: `end_date` is set only when the status is Completed
//! - C: when both dates are set, `end_date >= start_date`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Created, not yet started.
    Pending,
    /// Work in progress.
    Ongoing,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Ongoing => 1,
            Self::Completed => 2,
        }
    }

    /// Returns true if moving from `self` to `next` keeps the lifecycle
    /// moving forward (or leaves the status unchanged).
    #[must_use]
    pub const fn can_move_to(self, next: Self) -> bool {
        next.rank() >= self.rank()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }
}

/// Start and end dates of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDates {
    /// Date work began.
    pub start_date: Option<NaiveDate>,
    /// Date work finished.
    pub end_date: Option<NaiveDate>,
}

impl ProjectDates {
    /// Creates a date pair.
    #[must_use]
    pub const fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// Lifecycle rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Status string is not a known status.
    #[error("Status must be one of Pending, Ongoing, Completed (got {0:?})")]
    UnknownStatus(String),

    /// Start date given while the project is still pending.
    #[error("Start date can only be set when status is Ongoing or Completed")]
    StartDateWhilePending,

    /// End date given before the project is completed.
    #[error("End date can only be set when status is Completed")]
    EndDateBeforeCompletion,

    /// End date precedes start date.
    #[error("End date ({end}) cannot be before start date ({start})")]
    EndBeforeStart {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Status would move backwards.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ProjectStatus,
        /// The attempted status.
        to: ProjectStatus,
    },
}

/// Checks invariants A, B and C for a status and its dates.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn validate_state(status: ProjectStatus, dates: ProjectDates) -> Result<(), LifecycleError> {
    if dates.start_date.is_some() && status == ProjectStatus::Pending {
        return Err(LifecycleError::StartDateWhilePending);
    }
    if dates.end_date.is_some() && status != ProjectStatus::Completed {
        return Err(LifecycleError::EndDateBeforeCompletion);
    }
    if let (Some(start), Some(end)) = (dates.start_date, dates.end_date) {
        if end < start {
            return Err(LifecycleError::EndBeforeStart { start, end });
        }
    }
    Ok(())
}

/// Validates a move from `current` to `next` with the dates the record will
/// carry afterwards. Returns the new status.
///
/// Skipping `Ongoing` is allowed; moving backwards is not.
///
/// # Errors
///
/// Returns `LifecycleError::InvalidTransition` for a backward move, or the
/// first invariant that `next` with `dates` would violate.
pub fn transition(
    current: ProjectStatus,
    next: ProjectStatus,
    dates: ProjectDates,
) -> Result<ProjectStatus, LifecycleError> {
    if !current.can_move_to(next) {
        return Err(LifecycleError::InvalidTransition {
            from: current,
            to: next,
        });
    }
    validate_state(next, dates)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pending_without_dates_is_valid() {
        assert!(validate_state(ProjectStatus::Pending, ProjectDates::default()).is_ok());
    }

    #[test]
    fn test_pending_with_start_date_fails() {
        let dates = ProjectDates::new(Some(date(2025, 1, 1)), None);
        assert_eq!(
            validate_state(ProjectStatus::Pending, dates),
            Err(LifecycleError::StartDateWhilePending)
        );
    }

    #[rstest]
    #[case(ProjectStatus::Pending)]
    #[case(ProjectStatus::Ongoing)]
    fn test_end_date_requires_completed(#[case] status: ProjectStatus) {
        let dates = ProjectDates::new(None, Some(date(2025, 6, 1)));
        let result = validate_state(status, dates);
        assert!(result.is_err());
    }

    #[test]
    fn test_completed_end_before_start_fails() {
        let d1 = date(2025, 3, 10);
        let d0 = date(2025, 3, 9);
        let dates = ProjectDates::new(Some(d1), Some(d0));
        assert_eq!(
            validate_state(ProjectStatus::Completed, dates),
            Err(LifecycleError::EndBeforeStart { start: d1, end: d0 })
        );
    }

    #[test]
    fn test_completed_same_day_is_valid() {
        let d = date(2025, 3, 10);
        assert!(validate_state(ProjectStatus::Completed, ProjectDates::new(Some(d), Some(d))).is_ok());
    }

    #[test]
    fn test_forward_transitions() {
        let start = Some(date(2025, 1, 1));
        let end = Some(date(2025, 12, 31));

        assert_eq!(
            transition(
                ProjectStatus::Pending,
                ProjectStatus::Ongoing,
                ProjectDates::new(start, None)
            ),
            Ok(ProjectStatus::Ongoing)
        );
        assert_eq!(
            transition(
                ProjectStatus::Ongoing,
                ProjectStatus::Completed,
                ProjectDates::new(start, end)
            ),
            Ok(ProjectStatus::Completed)
        );
        assert_eq!(
            transition(
                ProjectStatus::Pending,
                ProjectStatus::Completed,
                ProjectDates::new(start, end)
            ),
            Ok(ProjectStatus::Completed)
        );
    }

    #[test]
    fn test_backward_transition_rejected() {
        let result = transition(
            ProjectStatus::Completed,
            ProjectStatus::Pending,
            ProjectDates::default(),
        );
        assert_eq!(
            result,
            Err(LifecycleError::InvalidTransition {
                from: ProjectStatus::Completed,
                to: ProjectStatus::Pending,
            })
        );
    }

    #[test]
    fn test_same_status_edit_still_checks_dates() {
        let result = transition(
            ProjectStatus::Ongoing,
            ProjectStatus::Ongoing,
            ProjectDates::new(Some(date(2025, 1, 1)), Some(date(2025, 2, 1))),
        );
        assert_eq!(result, Err(LifecycleError::EndDateBeforeCompletion));
    }

    #[rstest]
    #[case("Pending", ProjectStatus::Pending)]
    #[case("ongoing", ProjectStatus::Ongoing)]
    #[case("COMPLETED", ProjectStatus::Completed)]
    fn test_parse_status(#[case] input: &str, #[case] expected: ProjectStatus) {
        assert_eq!(input.parse::<ProjectStatus>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_status() {
        assert!("cancelled".parse::<ProjectStatus>().is_err());
    }
}
