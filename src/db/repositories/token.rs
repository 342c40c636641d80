use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use crate::entities::{prelude::*, refresh_tokens, verification_tokens};

/// Repository for account-verification and refresh tokens.
pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Verification tokens
    // ========================================================================

    /// Issue a one-time activation token for a freshly created account.
    pub async fn create_verification_token(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let active = verification_tokens::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            created_at: Set(now),
            ..Default::default()
        };

        VerificationTokens::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to store verification token")?;

        Ok(token)
    }

    pub async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<verification_tokens::Model>> {
        let row = VerificationTokens::find()
            .filter(verification_tokens::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query verification token")?;

        Ok(row)
    }

    /// Consume a verification token. Single use: the row is gone afterwards.
    pub async fn delete_verification_token(&self, id: i64) -> Result<()> {
        VerificationTokens::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete verification token")?;

        Ok(())
    }

    /// Most recently issued token for a user, if any is still outstanding.
    pub async fn latest_verification_token_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<String>> {
        let row = VerificationTokens::find()
            .filter(verification_tokens::Column::UserId.eq(user_id))
            .order_by_desc(verification_tokens::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query verification token for user")?;

        Ok(row.map(|r| r.token))
    }

    // ========================================================================
    // Refresh tokens
    // ========================================================================

    pub async fn create_refresh_token(&self) -> Result<String> {
        let token = generate_refresh_token();
        let now = chrono::Utc::now().to_rfc3339();

        let active = refresh_tokens::ActiveModel {
            token: Set(token.clone()),
            created_at: Set(now),
            ..Default::default()
        };

        RefreshTokens::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to store refresh token")?;

        Ok(token)
    }

    /// Existence is the whole validity check; refresh tokens carry no expiry.
    pub async fn refresh_token_exists(&self, token: &str) -> Result<bool> {
        let row = RefreshTokens::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query refresh token")?;

        Ok(row.is_some())
    }

    pub async fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        let result = RefreshTokens::delete_many()
            .filter(refresh_tokens::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to delete refresh token")?;

        if result.rows_affected > 0 {
            info!("Refresh token invalidated");
        }

        Ok(result.rows_affected > 0)
    }
}

/// Generate a random opaque refresh token (64 character hex string).
#[must_use]
pub fn generate_refresh_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_tokens_are_64_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn refresh_tokens_are_unique() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }
}
