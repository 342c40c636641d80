use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{posts, prelude::*, subreddits};

pub struct SubredditRepository {
    conn: DatabaseConnection,
}

impl SubredditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, name: &str, description: &str) -> Result<subreddits::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = subreddits::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Subreddits::insert(active).exec(&self.conn).await?;
        info!("Created subreddit '{}'", name);

        let created = Subreddits::find_by_id(res.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to reload created subreddit")?
            .ok_or_else(|| anyhow::anyhow!("Created subreddit disappeared"))?;

        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Option<subreddits::Model>> {
        let row = Subreddits::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query subreddit by ID")?;

        Ok(row)
    }

    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<subreddits::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Subreddits::find()
            .filter(subreddits::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await
            .context("Failed to query subreddits by IDs")?;

        Ok(rows)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<subreddits::Model>> {
        let row = Subreddits::find()
            .filter(subreddits::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query subreddit by name")?;

        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<subreddits::Model>> {
        let rows = Subreddits::find()
            .order_by_asc(subreddits::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Post totals for a set of subreddits, one grouped query.
    pub async fn post_counts(&self, subreddit_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if subreddit_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let results: Vec<(i64, i64)> = Posts::find()
            .select_only()
            .column(posts::Column::SubredditId)
            .column_as(posts::Column::SubredditId.count(), "count")
            .filter(posts::Column::SubredditId.is_in(subreddit_ids.to_vec()))
            .group_by(posts::Column::SubredditId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(results.into_iter().collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Subreddits::find().count(&self.conn).await?)
    }
}
