//! Domain service for signup, account verification, and the token pair
//! lifecycle (JWT access tokens + stored refresh tokens).

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is not verified yet")]
    AccountDisabled,

    #[error("Username or email already registered")]
    DuplicateUser,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("Token signing failed: {err}"))
    }
}

/// Access/refresh token pair issued on login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    /// RFC 3339 expiry of the access token.
    pub expires_at: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a disabled account and issues its one-time verification
    /// token (delivered through the mailer boundary).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUser`] when the username or email is
    /// already registered.
    async fn signup(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError>;

    /// Consumes a verification token and enables its account. The token is
    /// single use; a second call with the same token fails.
    async fn verify_account(&self, token: &str) -> Result<(), AuthError>;

    /// Verifies credentials and issues a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a bad username or
    /// password and [`AuthError::AccountDisabled`] for unverified accounts.
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchanges a refresh token for a fresh access token bound to the
    /// given username. Only the token's existence is checked.
    async fn refresh(&self, refresh_token: &str, username: &str) -> Result<TokenPair, AuthError>;

    /// Deletes a refresh token. Unknown tokens are a no-op.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Resolves a bearer access token to the user it is bound to.
    async fn resolve_bearer(&self, token: &str) -> Result<User, AuthError>;
}
