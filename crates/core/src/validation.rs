//! Format rules for user-supplied fields.
//!
//! Phone and NIC formats follow Sri Lankan conventions: mobile/landline
//! numbers as `0XXXXXXXXX` or `+94XXXXXXXXX`, NIC numbers in the old
//! (9 digits + V/X) or new (12 digits) layout.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use validator::ValidateEmail;

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z .'\-]{1,99}$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+94|0)\d{9}$").expect("valid regex"));
static NIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{9}[VvXx]|\d{12})$").expect("valid regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{3,30}$").expect("valid regex"));

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Maximum password length.
pub const MAX_PASSWORD_LEN: usize = 128;
/// Maximum item name length.
pub const MAX_ITEM_NAME_LEN: usize = 100;

/// A field failed its format rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationRuleError {
    /// Name contains characters other than letters, spaces, `.`, `'`, `-`.
    #[error("Full name must be 2-100 letters and may contain spaces, '.', ''' or '-'")]
    FullName,
    /// Phone is not a Sri Lankan number.
    #[error("Phone number must be 10 digits starting with 0, or +94 followed by 9 digits")]
    Phone,
    /// NIC is not in either layout.
    #[error("NIC number must be 9 digits followed by V or X, or 12 digits")]
    Nic,
    /// Email is malformed.
    #[error("Email address is invalid")]
    Email,
    /// Username has disallowed characters or length.
    #[error("Username must be 3-30 characters of letters, digits, '_' or '.'")]
    Username,
    /// Password is too short or too long.
    #[error("Password must be between 6 and 128 characters")]
    Password,
    /// A required text field is empty.
    #[error("{0} is required")]
    Required(&'static str),
    /// A text field is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },
}

/// Validates a person's full name.
///
/// # Errors
///
/// Returns `ValidationRuleError::FullName` on mismatch.
pub fn validate_full_name(name: &str) -> Result<(), ValidationRuleError> {
    if FULL_NAME_RE.is_match(name.trim()) {
        Ok(())
    } else {
        Err(ValidationRuleError::FullName)
    }
}

/// Validates a phone number.
///
/// # Errors
///
/// Returns `ValidationRuleError::Phone` on mismatch.
pub fn validate_phone(phone: &str) -> Result<(), ValidationRuleError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationRuleError::Phone)
    }
}

/// Validates a national identity card number.
///
/// # Errors
///
/// Returns `ValidationRuleError::Nic` on mismatch.
pub fn validate_nic(nic: &str) -> Result<(), ValidationRuleError> {
    if NIC_RE.is_match(nic.trim()) {
        Ok(())
    } else {
        Err(ValidationRuleError::Nic)
    }
}

/// Validates an email address.
///
/// # Errors
///
/// Returns `ValidationRuleError::Email` on mismatch.
pub fn validate_email(email: &str) -> Result<(), ValidationRuleError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationRuleError::Email)
    }
}

/// Validates a staff username.
///
/// # Errors
///
/// Returns `ValidationRuleError::Username` on mismatch.
pub fn validate_username(username: &str) -> Result<(), ValidationRuleError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationRuleError::Username)
    }
}

/// Validates password length.
///
/// # Errors
///
/// Returns `ValidationRuleError::Password` when out of bounds.
pub fn validate_password(password: &str) -> Result<(), ValidationRuleError> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationRuleError::Password)
    }
}

/// Validates a required free-text field and returns it trimmed.
///
/// # Errors
///
/// Returns `Required` when blank and `TooLong` past `max` characters.
pub fn require_text<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, ValidationRuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationRuleError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationRuleError::TooLong { field, max });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Nimal Perera", true)]
    #[case("D. S. Senanayake", true)]
    #[case("Mary-Ann O'Neil", true)]
    #[case("A", false)]
    #[case("R2D2", false)]
    #[case("", false)]
    fn test_full_name(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_full_name(name).is_ok(), ok);
    }

    #[rstest]
    #[case("0771234567", true)]
    #[case("+94771234567", true)]
    #[case("771234567", false)]
    #[case("07712345678", false)]
    #[case("+9477123456a", false)]
    fn test_phone(#[case] phone: &str, #[case] ok: bool) {
        assert_eq!(validate_phone(phone).is_ok(), ok);
    }

    #[rstest]
    #[case("853400937V", true)]
    #[case("853400937x", true)]
    #[case("198534009371", true)]
    #[case("85340093V", false)]
    #[case("19853400937", false)]
    fn test_nic(#[case] nic: &str, #[case] ok: bool) {
        assert_eq!(validate_nic(nic).is_ok(), ok);
    }

    #[rstest]
    #[case("a@b.com", true)]
    #[case("farmer.one@plantara.lk", true)]
    #[case("not-an-email", false)]
    #[case("a@", false)]
    fn test_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[rstest]
    #[case("admin", true)]
    #[case("field.officer_2", true)]
    #[case("ab", false)]
    #[case("has space", false)]
    fn test_username(#[case] username: &str, #[case] ok: bool) {
        assert_eq!(validate_username(username).is_ok(), ok);
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Location", "  Kandy  ", 50), Ok("Kandy"));
        assert_eq!(
            require_text("Location", "   ", 50),
            Err(ValidationRuleError::Required("Location"))
        );
        assert_eq!(
            require_text("Subject", "abcdef", 3),
            Err(ValidationRuleError::TooLong {
                field: "Subject",
                max: 3
            })
        );
    }
}
