//! Business logic services for Bug Tracker RS
//!
//! Thin orchestration above the repositories: credential handling, token
//! issuance, the verification-code flow and the dashboard fan-out.

pub mod dashboard;
pub mod mailer;
pub mod result;
pub mod users;
pub mod verification;

pub use result::{ServiceError, ServiceResult};
