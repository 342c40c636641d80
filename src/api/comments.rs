use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::services::CommentDto;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: i64,
    pub text: String,
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<ApiResponse<CommentDto>>, ApiError> {
    let created = state
        .comment_service()
        .create(payload.post_id, &payload.text, &user)
        .await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn list_comments_by_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let comments = state.comment_service().list_by_post(post_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

pub async fn list_comments_by_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let comments = state.comment_service().list_by_username(&username).await?;
    Ok(Json(ApiResponse::success(comments)))
}
