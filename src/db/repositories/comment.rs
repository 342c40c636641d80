use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{comments, prelude::*};

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, text: &str, user_id: i64, post_id: i64) -> Result<comments::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = comments::ActiveModel {
            text: Set(text.to_string()),
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Comments::insert(active).exec(&self.conn).await?;

        let created = Comments::find_by_id(res.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to reload created comment")?
            .ok_or_else(|| anyhow::anyhow!("Created comment disappeared"))?;

        Ok(created)
    }

    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<comments::Model>> {
        let rows = Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<comments::Model>> {
        let rows = Comments::find()
            .filter(comments::Column::UserId.eq(user_id))
            .order_by_desc(comments::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Comment totals for a set of posts, one grouped query.
    pub async fn counts_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let results: Vec<(i64, i64)> = Comments::find()
            .select_only()
            .column(comments::Column::PostId)
            .column_as(comments::Column::PostId.count(), "count")
            .filter(comments::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(comments::Column::PostId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(results.into_iter().collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Comments::find().count(&self.conn).await?)
    }
}
