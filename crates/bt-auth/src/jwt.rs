//! JWT issuance and validation
//!
//! HMAC-signed tokens carrying the user id, email and role. Expiry is
//! enforced on validation; an expired token is distinguishable from a
//! malformed one.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Identity;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for creating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_seconds: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and token lifetime
    pub fn new(secret: &[u8], expires_in_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expires_in_seconds,
        }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: i64, email: &str, role: &str) -> Result<String, JwtError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?
            .as_secs() as i64;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now as usize,
            // signed arithmetic so a negative lifetime yields an
            // already-expired token instead of wrapping
            exp: (now + self.expires_in_seconds).max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate signature and expiry, returning the embedded identity
    pub fn verify(&self, token: &str) -> Result<Identity, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        let claims = token_data.claims;
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::Invalid("Invalid user ID in token".to_string()))?;

        Ok(Identity::new(user_id, claims.email, claims.role))
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    if authorization.to_lowercase().starts_with("bearer ") {
        Some(authorization[7..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = JwtService::new(SECRET, 3600);

        let token = service.issue(1, "test@example.com", "user").unwrap();
        let identity = service.verify(&token).unwrap();

        assert_eq!(identity.user_id, 1);
        assert_eq!(identity.email, "test@example.com");
        assert_eq!(identity.role, "user");
    }

    #[test]
    fn test_expired_token_rejected() {
        // issued already past its expiry; default validation leeway is 60s
        let service = JwtService::new(SECRET, -120);

        let token = service.issue(1, "test@example.com", "user").unwrap();
        match service.verify(&token) {
            Err(JwtError::Expired) => {}
            other => panic!("expected Expired, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new(SECRET, 3600);
        let verifier = JwtService::new(b"a-completely-different-secret-key", 3600);

        let token = issuer.issue(1, "test@example.com", "user").unwrap();
        assert!(matches!(verifier.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
