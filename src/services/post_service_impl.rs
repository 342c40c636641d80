//! `SeaORM` implementation of the `PostService` trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::db::{Store, User};
use crate::entities::posts;
use crate::services::post_service::{CreatePost, PostError, PostResponse, PostService};
use crate::services::vote_service::VoteDirection;
use crate::timeago;

pub struct SeaOrmPostService {
    store: Store,
}

impl SeaOrmPostService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Map post rows to responses: author and subreddit names, comment
    /// counts, and the viewer's effective vote, each resolved in one
    /// batched query.
    async fn to_responses(
        &self,
        rows: Vec<posts::Model>,
        viewer: Option<&User>,
    ) -> Result<Vec<PostResponse>, PostError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = rows.iter().map(|p| p.id).collect();

        let mut user_ids: Vec<i64> = rows.iter().map(|p| p.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut subreddit_ids: Vec<i64> = rows.iter().map(|p| p.subreddit_id).collect();
        subreddit_ids.sort_unstable();
        subreddit_ids.dedup();

        let usernames: HashMap<i64, String> = self
            .store
            .get_users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let subreddit_names: HashMap<i64, String> = self
            .store
            .get_subreddits_by_ids(&subreddit_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let comment_counts = self.store.comment_counts_for_posts(&post_ids).await?;

        let viewer_votes = match viewer {
            Some(user) => self.store.latest_votes_for_posts(&post_ids, user.id).await?,
            None => HashMap::new(),
        };

        Ok(rows
            .into_iter()
            .map(|post| {
                let effective = viewer_votes
                    .get(&post.id)
                    .copied()
                    .and_then(VoteDirection::from_value);

                PostResponse {
                    id: post.id,
                    user_name: usernames
                        .get(&post.user_id)
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    subreddit_name: subreddit_names
                        .get(&post.subreddit_id)
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    comment_count: comment_counts.get(&post.id).copied().unwrap_or(0),
                    duration: timeago::since(&post.created_at),
                    up_vote: effective == Some(VoteDirection::Up),
                    down_vote: effective == Some(VoteDirection::Down),
                    name: post.name,
                    url: post.url,
                    description: post.description,
                    vote_count: post.vote_count,
                }
            })
            .collect())
    }

    async fn to_response(
        &self,
        row: posts::Model,
        viewer: Option<&User>,
    ) -> Result<PostResponse, PostError> {
        let mut responses = self.to_responses(vec![row], viewer).await?;
        responses
            .pop()
            .ok_or_else(|| PostError::Internal("Post mapping produced no rows".to_string()))
    }
}

#[async_trait]
impl PostService for SeaOrmPostService {
    async fn create(&self, request: CreatePost, author: &User) -> Result<PostResponse, PostError> {
        if request.name.is_empty() {
            return Err(PostError::Validation("Post name is required".to_string()));
        }

        let subreddit = self
            .store
            .get_subreddit_by_name(&request.subreddit_name)
            .await?
            .ok_or_else(|| PostError::SubredditNotFound(request.subreddit_name.clone()))?;

        let created = self
            .store
            .create_post(
                &request.name,
                request.url.as_deref(),
                request.description.as_deref(),
                author.id,
                subreddit.id,
            )
            .await?;

        self.to_response(created, Some(author)).await
    }

    async fn get(&self, id: i64, viewer: Option<&User>) -> Result<PostResponse, PostError> {
        let post = self
            .store
            .get_post(id)
            .await?
            .ok_or(PostError::NotFound(id))?;

        self.to_response(post, viewer).await
    }

    async fn list_all(&self, viewer: Option<&User>) -> Result<Vec<PostResponse>, PostError> {
        let rows = self.store.list_posts().await?;
        self.to_responses(rows, viewer).await
    }

    async fn list_by_subreddit(
        &self,
        subreddit_id: i64,
        viewer: Option<&User>,
    ) -> Result<Vec<PostResponse>, PostError> {
        if self.store.get_subreddit(subreddit_id).await?.is_none() {
            return Err(PostError::SubredditNotFound(subreddit_id.to_string()));
        }

        let rows = self.store.list_posts_by_subreddit(subreddit_id).await?;
        self.to_responses(rows, viewer).await
    }

    async fn list_by_username(
        &self,
        username: &str,
        viewer: Option<&User>,
    ) -> Result<Vec<PostResponse>, PostError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| PostError::UserNotFound(username.to_string()))?;

        let rows = self.store.list_posts_by_user(user.id).await?;
        self.to_responses(rows, viewer).await
    }
}
