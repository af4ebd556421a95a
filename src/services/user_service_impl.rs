//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::auth::password::hash_password;
use crate::config::SecurityConfig;
use crate::db::{NewUser, Store, User, UserPatch};
use crate::services::user_service::{CreateUser, UpdateUser, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn hash(&self, password: String) -> Result<String, UserError> {
        let config = self.security.clone();
        task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .map_err(|e| UserError::Internal(format!("Hashing task panicked: {e}")))?
            .map_err(|e| UserError::Internal(e.to_string()))
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn create_user(&self, request: CreateUser) -> Result<User, UserError> {
        if self.store.username_taken(&request.username, None).await? {
            return Err(UserError::Conflict("Username already registered".to_string()));
        }
        if self.store.email_taken(&request.email, None).await? {
            return Err(UserError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash(request.password).await?;

        let user = self
            .store
            .create_user(NewUser {
                email: request.email,
                username: request.username,
                password_hash,
                full_name: request.full_name,
            })
            .await?;

        info!(username = %user.username, id = user.id, "Registered user");

        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<User, UserError> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserError> {
        self.store
            .get_user_by_username(username)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn list_users(&self, skip: u64, limit: u64) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users(skip, limit).await?)
    }

    async fn update_user(&self, id: i32, request: UpdateUser) -> Result<User, UserError> {
        if let Some(username) = &request.username {
            if self.store.username_taken(username, Some(id)).await? {
                return Err(UserError::Conflict("Username already registered".to_string()));
            }
        }
        if let Some(email) = &request.email {
            if self.store.email_taken(email, Some(id)).await? {
                return Err(UserError::Conflict("Email already registered".to_string()));
            }
        }

        self.store
            .update_user(
                id,
                UserPatch {
                    email: request.email,
                    username: request.username,
                    full_name: request.full_name,
                    is_active: request.is_active,
                },
            )
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn delete_user(&self, id: i32) -> Result<(), UserError> {
        let deleted = self.store.delete_user(id).await?;
        if !deleted {
            return Err(UserError::NotFound);
        }

        info!(id, "Deleted user and owned records");

        Ok(())
    }
}
