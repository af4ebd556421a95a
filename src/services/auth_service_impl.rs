//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::scopes::scopes_for;
use crate::auth::token::TokenIssuer;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, IssuedToken};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenIssuer>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let is_valid = self
            .store
            .verify_user_credentials(username, password)
            .await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        // The row exists; verification just succeeded against it
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        self.store.record_user_login(&user.username).await?;

        let access_token = self
            .tokens
            .issue(&user.username, scopes_for(user.is_superuser))
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!(username = %user.username, "Issued access token");

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }
}
