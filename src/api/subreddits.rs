use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::services::SubredditDto;

#[derive(Debug, Deserialize)]
pub struct CreateSubredditRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_subreddit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateSubredditRequest>,
) -> Result<Json<ApiResponse<SubredditDto>>, ApiError> {
    let created = state
        .subreddit_service()
        .create(&payload.name, &payload.description)
        .await?;

    tracing::info!("User {} created subreddit '{}'", user.username, created.name);

    Ok(Json(ApiResponse::success(created)))
}

pub async fn list_subreddits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SubredditDto>>>, ApiError> {
    let subreddits = state.subreddit_service().list().await?;
    Ok(Json(ApiResponse::success(subreddits)))
}

pub async fn get_subreddit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SubredditDto>>, ApiError> {
    let subreddit = state.subreddit_service().get(id).await?;
    Ok(Json(ApiResponse::success(subreddit)))
}
