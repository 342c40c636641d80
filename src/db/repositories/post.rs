use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{posts, prelude::*};

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        name: &str,
        url: Option<&str>,
        description: Option<&str>,
        user_id: i64,
        subreddit_id: i64,
    ) -> Result<posts::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = posts::ActiveModel {
            name: Set(name.to_string()),
            url: Set(url.map(str::to_string)),
            description: Set(description.map(str::to_string)),
            vote_count: Set(0),
            user_id: Set(user_id),
            subreddit_id: Set(subreddit_id),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Posts::insert(active).exec(&self.conn).await?;
        info!("Created post '{}' in subreddit {}", name, subreddit_id);

        let created = Posts::find_by_id(res.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to reload created post")?
            .ok_or_else(|| anyhow::anyhow!("Created post disappeared"))?;

        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Option<posts::Model>> {
        let row = Posts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query post by ID")?;

        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<posts::Model>> {
        let rows = Posts::find()
            .order_by_desc(posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_subreddit(&self, subreddit_id: i64) -> Result<Vec<posts::Model>> {
        let rows = Posts::find()
            .filter(posts::Column::SubredditId.eq(subreddit_id))
            .order_by_desc(posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<posts::Model>> {
        let rows = Posts::find()
            .filter(posts::Column::UserId.eq(user_id))
            .order_by_desc(posts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Move the denormalized counter by `delta` (+1 or -1 per accepted vote).
    pub async fn adjust_vote_count(&self, post_id: i64, delta: i64) -> Result<()> {
        let post = Posts::find_by_id(post_id)
            .one(&self.conn)
            .await
            .context("Failed to query post for vote adjustment")?
            .ok_or_else(|| anyhow::anyhow!("Post not found: {post_id}"))?;

        let new_count = post.vote_count + delta;

        let mut active: posts::ActiveModel = post.into();
        active.vote_count = Set(new_count);
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Posts::find().count(&self.conn).await?)
    }
}
