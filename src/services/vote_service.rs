//! Domain service for vote accounting.
//!
//! The vote table is an append-only ledger; per (user, post) only the most
//! recent row counts. The post counter moves one unit per accepted vote,
//! with no compensation when a vote flips direction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::User;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Post {0} not found")]
    PostNotFound(i64),

    #[error("You have already {0}voted this post")]
    Duplicate(VoteDirection),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for VoteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for VoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Stored representation: +1 up, -1 down.
    #[must_use]
    pub const fn value(self) -> i16 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Counter adjustment for an accepted vote.
    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    #[must_use]
    pub const fn from_value(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            _ => None,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

#[async_trait::async_trait]
pub trait VoteService: Send + Sync {
    /// Records a vote by `caller` on a post and adjusts its counter.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError::Duplicate`] when the caller's effective vote
    /// already points the requested direction.
    async fn vote(
        &self,
        post_id: i64,
        direction: VoteDirection,
        caller: &User,
    ) -> Result<(), VoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_value_roundtrip() {
        assert_eq!(VoteDirection::from_value(1), Some(VoteDirection::Up));
        assert_eq!(VoteDirection::from_value(-1), Some(VoteDirection::Down));
        assert_eq!(VoteDirection::from_value(0), None);
        assert_eq!(VoteDirection::Up.value(), 1);
        assert_eq!(VoteDirection::Down.delta(), -1);
    }

    #[test]
    fn wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&VoteDirection::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::from_str::<VoteDirection>("\"down\"").unwrap(),
            VoteDirection::Down
        );
    }
}
