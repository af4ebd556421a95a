//! Domain service for user account management.

use thiserror::Error;

use crate::db::User;

/// Errors specific to user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        // Races past the explicit uniqueness checks land here
        let msg = err.to_string();
        if msg.contains("UNIQUE") {
            Self::Conflict("Username or email already registered".to_string())
        } else {
            Self::Internal(msg)
        }
    }
}

/// Fields for registering a user; the password is plaintext and is hashed
/// inside the service.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Partial account update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Domain service trait for user accounts.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Conflict`] if the username or email is taken.
    async fn create_user(&self, request: CreateUser) -> Result<User, UserError>;

    async fn get_user(&self, id: i32) -> Result<User, UserError>;

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserError>;

    async fn list_users(&self, skip: u64, limit: u64) -> Result<Vec<User>, UserError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Conflict`] if a changed username or email
    /// collides with another account.
    async fn update_user(&self, id: i32, request: UpdateUser) -> Result<User, UserError>;

    /// Deletes an account together with all tasks and categories it owns.
    async fn delete_user(&self, id: i32) -> Result<(), UserError>;
}
