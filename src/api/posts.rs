use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{CurrentUser, MaybeUser};
use super::{ApiError, ApiResponse, AppState};
use crate::services::{CreatePost, PostResponse};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub subreddit_name: String,
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let request = CreatePost {
        name: payload.name,
        url: payload.url,
        description: payload.description,
        subreddit_name: payload.subreddit_name,
    };

    let created = state.post_service().create(request, &user).await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let posts = state.post_service().list_all(viewer.as_ref()).await?;
    Ok(Json(ApiResponse::success(posts)))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state.post_service().get(id, viewer.as_ref()).await?;
    Ok(Json(ApiResponse::success(post)))
}

pub async fn list_posts_by_subreddit(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let posts = state
        .post_service()
        .list_by_subreddit(id, viewer.as_ref())
        .await?;
    Ok(Json(ApiResponse::success(posts)))
}

pub async fn list_posts_by_user(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let posts = state
        .post_service()
        .list_by_username(&username, viewer.as_ref())
        .await?;
    Ok(Json(ApiResponse::success(posts)))
}
