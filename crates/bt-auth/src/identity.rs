//! Authenticated request identity

use serde::{Deserialize, Serialize};

/// The decoded, verified payload of a bearer token; lives for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: i64, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            role: role.into(),
        }
    }

    /// Case-insensitive role comparison
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_check_is_case_insensitive() {
        let identity = Identity::new(1, "a@x.com", "Admin");
        assert!(identity.has_role("admin"));
        assert!(identity.has_role("ADMIN"));
        assert!(identity.is_admin());
        assert!(!identity.has_role("user"));
    }
}
