//! Authentication and authorization for Bug Tracker RS
//!
//! JWT issuance/validation, password hashing, and the per-request
//! authenticated identity.

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::Identity;
pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use password::{hash_password, verify_password, PasswordError};
