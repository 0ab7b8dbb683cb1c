//! JWT token generation and validation.
//!
//! Session tokens are stateless HS256 JWTs with a fixed lifetime. A token is
//! accepted only while its signature verifies and the current time is before
//! `exp`; no clock leeway is granted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, IssuedToken};
use crate::config::JwtSettings;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_ttl_secs: 3600,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            token_ttl_secs: i64::try_from(settings.token_ttl_secs).unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// No signing secret was configured.
    #[error("jwt signing secret is not configured")]
    MissingSecret,

    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is malformed or its signature does not verify.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_ttl_secs", &self.config.token_ttl_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if the secret is blank.
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        if config.secret.trim().is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Issues a session token for a subject, valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue(&self, subject_id: Uuid, role: &str) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_at(
        &self,
        subject_id: Uuid,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let expires_at = issued_at + Duration::seconds(self.config.token_ttl_secs);
        let claims = Claims::new(subject_id, role, issued_at, expires_at);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.config.token_ttl_secs,
        })
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::Invalid` if the token is malformed or forged.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })?;

        // The library compares `exp` against whole seconds; enforce now < exp.
        if claims.is_expired_at(Utc::now()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_ttl_secs: 3600,
        })
        .unwrap()
    }

    #[test]
    fn test_issue_token() {
        let service = create_test_service();
        let issued = service.issue(Uuid::new_v4(), "customer").unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in, 3600);
    }

    #[test]
    fn test_verify_round_trip() {
        let service = create_test_service();
        let subject = Uuid::new_v4();

        let issued = service.issue(subject, "admin").unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.subject_id(), subject);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::hours(2);

        let issued = service
            .issue_at(Uuid::new_v4(), "staff", issued_at)
            .unwrap();

        assert!(matches!(
            service.verify(&issued.token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Invalid)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let service = create_test_service();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            token_ttl_secs: 3600,
        })
        .unwrap();

        let issued = other.issue(Uuid::new_v4(), "admin").unwrap();
        assert!(matches!(
            service.verify(&issued.token),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let result = JwtService::new(JwtConfig {
            secret: "  ".to_string(),
            token_ttl_secs: 3600,
        });
        assert!(matches!(result, Err(JwtError::MissingSecret)));
    }
}
