use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::VoteDirection;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub post_id: i64,
    pub direction: VoteDirection,
}

/// POST /api/votes
/// Repeating the caller's effective direction is rejected; a flip moves
/// the counter by one unit.
pub async fn vote(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .vote_service()
        .vote(payload.post_id, payload.direction, &user)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Vote recorded",
    ))))
}
