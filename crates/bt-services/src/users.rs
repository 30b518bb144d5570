//! User account service
//!
//! Registration, login, profile maintenance and password rotation.
//! Password material never crosses this boundary unhashed on the way down.

use std::sync::Arc;

use bt_auth::{hash_password, verify_password, JwtService};
use bt_db::users::{CreateUser, UpdateUser, UserRepository, UserRow};

use crate::result::{ServiceError, ServiceResult};

/// Parameters for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// User account orchestration over the user repository
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(users: UserRepository, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// Create an account; the plaintext password is hashed here and only
    /// the hash is persisted.
    pub async fn register(&self, params: RegisterParams) -> ServiceResult<UserRow> {
        let password_hash = hash_password(&params.password)?;

        let user = self
            .users
            .create(CreateUser {
                username: params.username,
                email: params.email,
                password_hash,
                role: params.role,
                is_verified: None,
            })
            .await?;

        tracing::info!(user_id = user.user_id, "User registered");
        Ok(user)
    }

    /// Authenticate by email (case-insensitive) and password, returning a
    /// signed token and the account row.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(String, UserRow)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.jwt.issue(user.user_id, &user.email, &user.role)?;
        tracing::info!(user_id = user.user_id, "User logged in");
        Ok((token, user))
    }

    pub async fn profile(&self, user_id: i64) -> ServiceResult<UserRow> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    /// Partial profile update for one user
    pub async fn update_profile(&self, user_id: i64, dto: UpdateUser) -> ServiceResult<UserRow> {
        self.users
            .update(user_id, dto)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    /// Rotate the password hash after verifying the current password
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password)?;
        self.users
            .update(
                user_id,
                UpdateUser {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn list(&self) -> ServiceResult<Vec<UserRow>> {
        Ok(self.users.find_all().await?)
    }

    /// True iff the user existed and was removed
    pub async fn delete(&self, user_id: i64) -> ServiceResult<bool> {
        Ok(self.users.delete(user_id).await?)
    }
}
