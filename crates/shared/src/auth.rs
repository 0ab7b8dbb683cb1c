//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer or staff ID).
    pub sub: Uuid,
    /// Role name: `customer`, `staff` or `admin`.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims issued at `issued_at` and expiring at `expires_at`.
    #[must_use]
    pub fn new(
        subject_id: Uuid,
        role: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject_id,
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the subject ID from claims.
    #[must_use]
    pub const fn subject_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the claims are past their expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly signed session token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    /// The encoded token.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
