//! User repository
//!
//! Database operations for users, including the verification-code pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::repository::{RepositoryError, RepositoryResult};

const USER_COLUMNS: &str = "user_id, username, email, password_hash, role, \
                            created_at, is_verified, verification_code, code_expiry";

/// User database entity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub code_expiry: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Case-insensitive role check
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// DTO for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub is_verified: Option<bool>,
}

/// DTO for updating a user; only present fields are written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

impl UpdateUser {
    pub fn has_changes(&self) -> bool {
        self.username.is_some()
            || self.email.is_some()
            || self.password_hash.is_some()
            || self.role.is_some()
    }
}

/// User repository implementation
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All users, newest first
    pub async fn find_all(&self) -> RepositoryResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Find a user by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a user and return the materialized row
    pub async fn create(&self, dto: CreateUser) -> RepositoryResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role, is_verified) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&dto.password_hash)
        .bind(dto.role.as_deref().unwrap_or("user"))
        .bind(dto.is_verified.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Partial update; `None` when the id matched no row
    pub async fn update(&self, id: i64, dto: UpdateUser) -> RepositoryResult<Option<UserRow>> {
        if !dto.has_changes() {
            return Err(RepositoryError::NothingToUpdate);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(username) = &dto.username {
                fields.push("username = ").push_bind_unseparated(username);
            }
            if let Some(email) = &dto.email {
                fields.push("email = ").push_bind_unseparated(email);
            }
            if let Some(password_hash) = &dto.password_hash {
                fields
                    .push("password_hash = ")
                    .push_bind_unseparated(password_hash);
            }
            if let Some(role) = &dto.role {
                fields.push("role = ").push_bind_unseparated(role);
            }
        }
        builder.push(" WHERE user_id = ").push_bind(id);
        builder.push(format!(" RETURNING {USER_COLUMNS}"));

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Replace the verification code/expiry pair; true iff the email matched
    pub async fn set_verification_code(
        &self,
        email: &str,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET verification_code = $1, code_expiry = $2 \
             WHERE LOWER(email) = LOWER($3)",
        )
        .bind(code)
        .bind(expiry)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Consume the verification pair and flag the account verified
    pub async fn mark_verified(&self, email: &str) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, verification_code = NULL, \
             code_expiry = NULL WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// True iff at least one row was removed
    pub async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_has_no_changes() {
        let dto = UpdateUser::default();
        assert!(!dto.has_changes());
    }

    #[test]
    fn test_update_deserializes_partial_payload() {
        let dto: UpdateUser =
            serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert_eq!(dto.username.as_deref(), Some("alice"));
        assert!(dto.email.is_none());
        assert!(dto.has_changes());
    }

    #[test]
    fn test_password_hash_not_settable_from_payload() {
        // the hash only enters through the change-password service path
        let dto: UpdateUser =
            serde_json::from_str(r#"{"passwordHash": "sneaky"}"#).unwrap();
        assert!(dto.password_hash.is_none());
    }

    #[test]
    fn test_is_admin_case_insensitive() {
        let row = UserRow {
            user_id: 1,
            username: "a".into(),
            email: "a@x.com".into(),
            password_hash: String::new(),
            role: "Admin".into(),
            created_at: Utc::now(),
            is_verified: true,
            verification_code: None,
            code_expiry: None,
        };
        assert!(row.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let row = UserRow {
            user_id: 1,
            username: "a".into(),
            email: "a@x.com".into(),
            password_hash: "secret".into(),
            role: "user".into(),
            created_at: Utc::now(),
            is_verified: true,
            verification_code: Some("123456".into()),
            code_expiry: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("123456"));
        assert!(json.contains("\"userId\":1"));
    }
}
