//! `SeaORM` implementation of the `CommentService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::db::{Store, User};
use crate::entities::comments;
use crate::services::comment_service::{CommentDto, CommentError, CommentService};
use crate::services::mail::{Mailer, NotificationEmail};

pub struct SeaOrmCommentService {
    store: Store,
    mailer: Arc<dyn Mailer>,
}

impl SeaOrmCommentService {
    #[must_use]
    pub fn new(store: Store, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    fn to_dto(comment: comments::Model, user_name: String) -> CommentDto {
        CommentDto {
            id: comment.id,
            post_id: comment.post_id,
            text: comment.text,
            user_name,
            created_at: comment.created_at,
        }
    }
}

#[async_trait]
impl CommentService for SeaOrmCommentService {
    async fn create(
        &self,
        post_id: i64,
        text: &str,
        author: &User,
    ) -> Result<CommentDto, CommentError> {
        if text.is_empty() {
            return Err(CommentError::Validation(
                "Comment text is required".to_string(),
            ));
        }

        let post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or(CommentError::PostNotFound(post_id))?;

        let comment = self.store.create_comment(text, author.id, post.id).await?;

        // Notify the post author. A failed notification must not lose the
        // comment, so delivery problems are only logged.
        match self.store.get_user_by_id(post.user_id).await? {
            Some(post_author) => {
                let target = post.url.clone().unwrap_or_else(|| post.name.clone());
                let mail = NotificationEmail {
                    recipient: post_author.email,
                    subject: "New comment on your post".to_string(),
                    body: format!("{} posted a comment on your post {}", author.username, target),
                };

                if let Err(e) = self.mailer.send(mail).await {
                    warn!("Comment notification not delivered: {e}");
                }
            }
            None => warn!("Post {} has no author on record", post.id),
        }

        Ok(Self::to_dto(comment, author.username.clone()))
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentDto>, CommentError> {
        if self.store.get_post(post_id).await?.is_none() {
            return Err(CommentError::PostNotFound(post_id));
        }

        let rows = self.store.list_comments_by_post(post_id).await?;

        let mut user_ids: Vec<i64> = rows.iter().map(|c| c.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let usernames: HashMap<i64, String> = self
            .store
            .get_users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(rows
            .into_iter()
            .map(|c| {
                let user_name = usernames
                    .get(&c.user_id)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                Self::to_dto(c, user_name)
            })
            .collect())
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<CommentDto>, CommentError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| CommentError::UserNotFound(username.to_string()))?;

        let rows = self.store.list_comments_by_user(user.id).await?;

        Ok(rows
            .into_iter()
            .map(|c| Self::to_dto(c, user.username.clone()))
            .collect())
    }
}
