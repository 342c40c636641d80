//! Domain service for comments, including the author notification mail.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Post {0} not found")]
    PostNotFound(i64),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CommentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CommentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDto {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub user_name: String,
    pub created_at: String,
}

#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    /// Creates a comment on a post and notifies the post author.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::PostNotFound`] for an unknown post.
    async fn create(
        &self,
        post_id: i64,
        text: &str,
        author: &User,
    ) -> Result<CommentDto, CommentError>;

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentDto>, CommentError>;

    async fn list_by_username(&self, username: &str) -> Result<Vec<CommentDto>, CommentError>;
}
