//! Domain service for posts, including the viewer-dependent response
//! mapping (vote flags, comment counts, age strings).

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post {0} not found")]
    NotFound(i64),

    #[error("Subreddit '{0}' not found")]
    SubredditNotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for PostError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PostError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePost {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub subreddit_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub user_name: String,
    pub subreddit_name: String,
    pub vote_count: i64,
    pub comment_count: i64,
    /// Human-readable age, e.g. "3 hours ago".
    pub duration: String,
    /// True when the viewer's effective vote on this post is an upvote.
    pub up_vote: bool,
    pub down_vote: bool,
}

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    /// Creates a post in a named subreddit.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::SubredditNotFound`] for an unknown subreddit.
    async fn create(&self, request: CreatePost, author: &User) -> Result<PostResponse, PostError>;

    async fn get(&self, id: i64, viewer: Option<&User>) -> Result<PostResponse, PostError>;

    async fn list_all(&self, viewer: Option<&User>) -> Result<Vec<PostResponse>, PostError>;

    async fn list_by_subreddit(
        &self,
        subreddit_id: i64,
        viewer: Option<&User>,
    ) -> Result<Vec<PostResponse>, PostError>;

    async fn list_by_username(
        &self,
        username: &str,
        viewer: Option<&User>,
    ) -> Result<Vec<PostResponse>, PostError>;
}
