use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, votes};

/// Vote rows are append-only; per (post, user) only the newest row counts.
pub struct VoteRepository {
    conn: DatabaseConnection,
}

impl VoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, post_id: i64, user_id: i64, direction: i16) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = votes::ActiveModel {
            direction: Set(direction),
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(now),
            ..Default::default()
        };

        Votes::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert vote")?;

        Ok(())
    }

    /// The effective vote for a (post, user) pair: the most recent row.
    pub async fn latest_for(&self, post_id: i64, user_id: i64) -> Result<Option<votes::Model>> {
        let row = Votes::find()
            .filter(votes::Column::PostId.eq(post_id))
            .filter(votes::Column::UserId.eq(user_id))
            .order_by_desc(votes::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query latest vote")?;

        Ok(row)
    }

    /// Effective vote direction per post for one viewer across many posts.
    pub async fn latest_for_posts(
        &self,
        post_ids: &[i64],
        user_id: i64,
    ) -> Result<HashMap<i64, i16>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Rows arrive oldest-first; later inserts overwrite earlier ones so
        // the map ends up holding the newest direction per post.
        let rows = Votes::find()
            .filter(votes::Column::PostId.is_in(post_ids.to_vec()))
            .filter(votes::Column::UserId.eq(user_id))
            .order_by_asc(votes::Column::Id)
            .all(&self.conn)
            .await?;

        let mut map = HashMap::new();
        for row in rows {
            map.insert(row.post_id, row.direction);
        }

        Ok(map)
    }
}
