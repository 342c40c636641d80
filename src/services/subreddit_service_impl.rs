//! `SeaORM` implementation of the `SubredditService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::subreddits;
use crate::services::subreddit_service::{SubredditDto, SubredditError, SubredditService};

pub struct SeaOrmSubredditService {
    store: Store,
}

impl SeaOrmSubredditService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn to_dto(model: subreddits::Model, number_of_posts: i64) -> SubredditDto {
        SubredditDto {
            id: model.id,
            name: model.name,
            description: model.description,
            number_of_posts,
        }
    }
}

#[async_trait]
impl SubredditService for SeaOrmSubredditService {
    async fn create(&self, name: &str, description: &str) -> Result<SubredditDto, SubredditError> {
        if name.is_empty() {
            return Err(SubredditError::Validation(
                "Subreddit name is required".to_string(),
            ));
        }

        if self.store.get_subreddit_by_name(name).await?.is_some() {
            return Err(SubredditError::DuplicateName(name.to_string()));
        }

        let created = self.store.create_subreddit(name, description).await?;

        Ok(Self::to_dto(created, 0))
    }

    async fn list(&self) -> Result<Vec<SubredditDto>, SubredditError> {
        let rows = self.store.list_subreddits().await?;
        let ids: Vec<i64> = rows.iter().map(|s| s.id).collect();
        let counts = self.store.subreddit_post_counts(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|s| {
                let posts = counts.get(&s.id).copied().unwrap_or(0);
                Self::to_dto(s, posts)
            })
            .collect())
    }

    async fn get(&self, id: i64) -> Result<SubredditDto, SubredditError> {
        let subreddit = self
            .store
            .get_subreddit(id)
            .await?
            .ok_or(SubredditError::NotFound(id))?;

        let counts = self.store.subreddit_post_counts(&[id]).await?;
        let posts = counts.get(&id).copied().unwrap_or(0);

        Ok(Self::to_dto(subreddit, posts))
    }
}
