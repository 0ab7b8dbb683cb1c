//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Account role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_against_dummy, verify_password};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried in a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A registered plantation customer.
    Customer,
    /// Field or office staff.
    Staff,
    /// Staff member whose role record is "Admin".
    Admin,
}

impl Role {
    /// Every role.
    pub const ALL: &'static [Self] = &[Self::Customer, Self::Staff, Self::Admin];
    /// Staff and administrators.
    pub const STAFF_OR_ADMIN: &'static [Self] = &[Self::Staff, Self::Admin];
    /// Customers and administrators.
    pub const CUSTOMER_OR_ADMIN: &'static [Self] = &[Self::Customer, Self::Admin];
    /// Administrators only.
    pub const ADMIN: &'static [Self] = &[Self::Admin];
    /// Customers only.
    pub const CUSTOMER: &'static [Self] = &[Self::Customer];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    /// Maps a staff role record name onto a token role.
    ///
    /// "Admin" (any case) grants `Admin`; every other staff role is `Staff`.
    #[must_use]
    pub fn from_staff_role_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Staff
        }
    }

    /// Returns true if this role is in `allowed`.
    #[must_use]
    pub fn is_one_of(&self, allowed: &[Self]) -> bool {
        allowed.contains(self)
    }

    /// Returns true for staff-side roles.
    #[must_use]
    pub const fn is_staff_side(&self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("customer", Role::Customer)]
    #[case("Staff", Role::Staff)]
    #[case(" ADMIN ", Role::Admin)]
    fn test_parse_role(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_role() {
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn test_staff_role_name_mapping() {
        assert_eq!(Role::from_staff_role_name("Admin"), Role::Admin);
        assert_eq!(Role::from_staff_role_name("admin"), Role::Admin);
        assert_eq!(Role::from_staff_role_name("Staff"), Role::Staff);
        assert_eq!(Role::from_staff_role_name("Field Officer"), Role::Staff);
    }

    #[test]
    fn test_allow_lists() {
        assert!(Role::Admin.is_one_of(Role::STAFF_OR_ADMIN));
        assert!(Role::Staff.is_one_of(Role::STAFF_OR_ADMIN));
        assert!(!Role::Customer.is_one_of(Role::STAFF_OR_ADMIN));
        assert!(!Role::Staff.is_one_of(Role::ADMIN));
        assert!(Role::Customer.is_one_of(Role::CUSTOMER_OR_ADMIN));
        assert!(Role::Admin.is_staff_side());
        assert!(!Role::Customer.is_staff_side());
    }
}
