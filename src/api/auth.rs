use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{HeaderMap, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::db::User;
use crate::services::TokenPair;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Shared body of the refresh and logout endpoints.
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct AuthenticationResponse {
    pub username: String,
    pub authentication_token: String,
    pub refresh_token: String,
    pub expires_at: String,
}

impl From<TokenPair> for AuthenticationResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            username: pair.username,
            authentication_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_at: pair.expires_at,
        }
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// Caller identity resolved from the `Authorization: Bearer` header.
/// Rejects the request with 401 when the header is missing or invalid.
pub struct CurrentUser(pub User);

/// Optional caller identity for endpoints that serve anonymous readers but
/// enrich responses for logged-in ones. Never rejects.
pub struct MaybeUser(pub Option<User>);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let user = state
            .auth_service()
            .resolve_bearer(&token)
            .await
            .map_err(|_| ApiError::unauthorized("Invalid bearer token"))?;

        tracing::Span::current().record("user_id", user.username.as_str());

        Ok(Self(user))
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(&parts.headers) {
            Some(token) => state.auth_service().resolve_bearer(&token).await.ok(),
            None => None,
        };

        if let Some(user) = &user {
            tracing::Span::current().record("user_id", user.username.as_str());
        }

        Ok(Self(user))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/signup
/// Create a disabled account and issue its activation token.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "User registration successful, check your mail to activate the account",
    ))))
}

/// GET /api/auth/account-verification/{token}
/// Consume a one-time activation token. A second call with the same token
/// fails with an invalid-token error.
pub async fn verify_account(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service().verify_account(&token).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Account activated",
    ))))
}

/// POST /api/auth/login
/// Exchange credentials for an access/refresh token pair.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthenticationResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let pair = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(pair.into())))
}

/// POST /api/auth/refresh/token
/// Reissue an access token against a stored refresh token. The refresh
/// token itself is returned unchanged.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<AuthenticationResponse>>, ApiError> {
    let pair = state
        .auth_service()
        .refresh(&payload.refresh_token, &payload.username)
        .await?;

    Ok(Json(ApiResponse::success(pair.into())))
}

/// POST /api/auth/logout
/// Delete the refresh token, ending the session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service().logout(&payload.refresh_token).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Refresh token deleted",
    ))))
}
