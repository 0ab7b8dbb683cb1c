//! Unit tests for session token claims.

use crate::auth::Claims;
use chrono::{Duration, Utc};
use rstest::rstest;
use uuid::Uuid;

#[test]
fn test_claims_new_sets_correct_fields() {
    let subject = Uuid::new_v4();
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(1);

    let claims = Claims::new(subject, "customer", issued_at, expires_at);

    assert_eq!(claims.sub, subject);
    assert_eq!(claims.role, "customer");
    assert_eq!(claims.iat, issued_at.timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[rstest]
#[case("customer")]
#[case("staff")]
#[case("admin")]
fn test_claims_with_different_roles(#[case] role: &str) {
    let now = Utc::now();
    let claims = Claims::new(Uuid::new_v4(), role, now, now + Duration::hours(1));
    assert_eq!(claims.role, role);
}

#[test]
fn test_claims_expiry_boundary() {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(1);
    let claims = Claims::new(Uuid::new_v4(), "staff", issued_at, expires_at);

    assert!(!claims.is_expired_at(issued_at));
    assert!(!claims.is_expired_at(expires_at - Duration::seconds(1)));
    assert!(claims.is_expired_at(expires_at));
    assert!(claims.is_expired_at(expires_at + Duration::seconds(1)));
}
