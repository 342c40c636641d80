//! `SeaORM` implementation of the `VoteService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::db::{Store, User};
use crate::services::vote_service::{VoteDirection, VoteError, VoteService};

pub struct SeaOrmVoteService {
    store: Store,
}

impl SeaOrmVoteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VoteService for SeaOrmVoteService {
    async fn vote(
        &self,
        post_id: i64,
        direction: VoteDirection,
        caller: &User,
    ) -> Result<(), VoteError> {
        let post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or(VoteError::PostNotFound(post_id))?;

        if let Some(previous) = self.store.latest_vote(post.id, caller.id).await?
            && previous.direction == direction.value()
        {
            return Err(VoteError::Duplicate(direction));
        }

        self.store
            .insert_vote(post.id, caller.id, direction.value())
            .await?;

        // One unit per accepted vote; a flip gets no compensation for the
        // prior opposite row.
        self.store
            .adjust_post_vote_count(post.id, direction.delta())
            .await?;

        debug!(
            "User {} {}voted post {} (counter {:+})",
            caller.username,
            direction,
            post.id,
            direction.delta()
        );

        Ok(())
    }
}
