//! Email verification flow
//!
//! Per-user state machine: `Unverified(code, expiry)` transitions to
//! `Verified` only on an exact code match before the expiry. Resending
//! replaces the stored pair atomically regardless of current state.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use bt_db::users::UserRepository;

use crate::mailer::VerificationMailer;
use crate::result::{ServiceError, ServiceResult};

/// Hours a freshly issued code stays valid
const CODE_VALIDITY_HOURS: i64 = 24;

/// Generate a 6-digit numeric verification code
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Decide whether a presented code consumes the stored pair.
///
/// Pure so the expiry edge cases are testable without a database.
pub fn code_is_valid(
    stored_code: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    presented: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored_code, expiry) {
        (Some(code), Some(expiry)) => code == presented && now < expiry,
        _ => false,
    }
}

/// Verification-code orchestration over the user repository and the mailer
#[derive(Clone)]
pub struct VerificationService {
    users: UserRepository,
    mailer: Arc<dyn VerificationMailer>,
}

impl VerificationService {
    pub fn new(users: UserRepository, mailer: Arc<dyn VerificationMailer>) -> Self {
        Self { users, mailer }
    }

    /// Attempt to consume a verification code.
    ///
    /// Returns `Ok(false)` for an unknown email, mismatched code or
    /// expired pair; the account stays unverified in all three cases.
    pub async fn verify(&self, email: &str, code: &str) -> ServiceResult<bool> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(false),
        };

        if !code_is_valid(
            user.verification_code.as_deref(),
            user.code_expiry,
            code,
            Utc::now(),
        ) {
            tracing::info!(user_id = user.user_id, "Verification code rejected");
            return Ok(false);
        }

        self.users.mark_verified(email).await?;
        tracing::info!(user_id = user.user_id, "Email verified");
        Ok(true)
    }

    /// Issue a fresh code with a 24-hour window, replacing any stored
    /// pair, and hand it to the mailer.
    pub async fn resend(&self, email: &str) -> ServiceResult<()> {
        let code = generate_code();
        let expiry = Utc::now() + Duration::hours(CODE_VALIDITY_HOURS);

        let known = self.users.set_verification_code(email, &code, expiry).await?;
        if !known {
            return Err(ServiceError::NotFound("User"));
        }

        self.mailer
            .send_code(email, &code)
            .await
            .map_err(ServiceError::Email)?;

        tracing::info!(email, "Verification code reissued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_matching_unexpired_code_is_valid() {
        let now = Utc::now();
        assert!(code_is_valid(
            Some("123456"),
            Some(now + Duration::hours(1)),
            "123456",
            now,
        ));
    }

    #[test]
    fn test_expired_code_never_validates_even_on_exact_match() {
        let now = Utc::now();
        assert!(!code_is_valid(
            Some("123456"),
            Some(now - Duration::seconds(1)),
            "123456",
            now,
        ));
    }

    #[test]
    fn test_mismatched_code_is_invalid() {
        let now = Utc::now();
        assert!(!code_is_valid(
            Some("123456"),
            Some(now + Duration::hours(1)),
            "654321",
            now,
        ));
    }

    #[test]
    fn test_missing_pair_is_invalid() {
        let now = Utc::now();
        assert!(!code_is_valid(None, None, "123456", now));
        assert!(!code_is_valid(Some("123456"), None, "123456", now));
        assert!(!code_is_valid(None, Some(now + Duration::hours(1)), "123456", now));
    }
}
