//! Domain service for subreddits (named groupings of posts).

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubredditError {
    #[error("Subreddit {0} not found")]
    NotFound(i64),

    #[error("Subreddit '{0}' already exists")]
    DuplicateName(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SubredditError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SubredditError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubredditDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub number_of_posts: i64,
}

#[async_trait::async_trait]
pub trait SubredditService: Send + Sync {
    /// Creates a subreddit.
    ///
    /// # Errors
    ///
    /// Returns [`SubredditError::DuplicateName`] when the name is taken.
    async fn create(&self, name: &str, description: &str) -> Result<SubredditDto, SubredditError>;

    /// Lists every subreddit with its post total.
    async fn list(&self) -> Result<Vec<SubredditDto>, SubredditError>;

    /// Fetches one subreddit by id.
    async fn get(&self, id: i64) -> Result<SubredditDto, SubredditError>;
}
