//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::JwtProvider;
use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, TokenPair};
use crate::services::mail::{Mailer, NotificationEmail};

pub struct SeaOrmAuthService {
    store: Store,
    jwt: JwtProvider,
    mailer: Arc<dyn Mailer>,
    security: SecurityConfig,
    verification_base_url: String,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        jwt: JwtProvider,
        mailer: Arc<dyn Mailer>,
        security: SecurityConfig,
        verification_base_url: String,
    ) -> Self {
        Self {
            store,
            jwt,
            mailer,
            security,
            verification_base_url,
        }
    }

    fn token_pair(&self, username: &str, refresh_token: String) -> Result<TokenPair, AuthError> {
        let (access_token, expires_at) = self.jwt.generate_token(username)?;

        Ok(TokenPair {
            username: username.to_string(),
            access_token,
            refresh_token,
            expires_at: expires_at.to_rfc3339(),
        })
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.store.user_exists(username, email).await? {
            return Err(AuthError::DuplicateUser);
        }

        let user = self
            .store
            .create_user(username, email, password, Some(&self.security))
            .await?;

        let token = self.store.create_verification_token(user.id).await?;

        self.mailer
            .send(NotificationEmail {
                recipient: user.email,
                subject: "Please activate your account".to_string(),
                body: format!(
                    "Thank you for signing up, please click the link below to \
                     activate your account:\n{}/{}",
                    self.verification_base_url, token
                ),
            })
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!("Registered user '{}' (pending verification)", username);

        Ok(())
    }

    async fn verify_account(&self, token: &str) -> Result<(), AuthError> {
        let row = self
            .store
            .find_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        self.store.set_user_enabled(row.user_id, true).await?;

        // Single use: the row must be gone before the call returns.
        self.store.delete_verification_token(row.id).await?;

        info!("Account {} verified", row.user_id);

        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        let refresh_token = self.store.create_refresh_token().await?;

        self.token_pair(&user.username, refresh_token)
    }

    async fn refresh(&self, refresh_token: &str, username: &str) -> Result<TokenPair, AuthError> {
        // Existence is the whole check; refresh tokens carry no expiry.
        if !self.store.refresh_token_exists(refresh_token).await? {
            return Err(AuthError::InvalidRefreshToken);
        }

        self.token_pair(username, refresh_token.to_string())
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.store.delete_refresh_token(refresh_token).await?;
        Ok(())
    }

    async fn resolve_bearer(&self, token: &str) -> Result<User, AuthError> {
        let username = self
            .jwt
            .decode_username(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .get_user_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
