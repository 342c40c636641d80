use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod comments;
mod error;
mod observability;
mod posts;
mod subreddits;
mod system;
mod types;
mod votes;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: SharedState,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn subreddit_service(&self) -> &Arc<dyn crate::services::SubredditService> {
        &self.shared.subreddit_service
    }

    #[must_use]
    pub fn post_service(&self) -> &Arc<dyn crate::services::PostService> {
        &self.shared.post_service
    }

    #[must_use]
    pub fn comment_service(&self) -> &Arc<dyn crate::services::CommentService> {
        &self.shared.comment_service
    }

    #[must_use]
    pub fn vote_service(&self) -> &Arc<dyn crate::services::VoteService> {
        &self.shared.vote_service
    }
}

pub fn create_app_state(
    shared: SharedState,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = SharedState::new(config).await?;
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let api_router = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route(
            "/auth/account-verification/{token}",
            get(auth::verify_account),
        )
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh/token", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/subreddit",
            get(subreddits::list_subreddits).post(subreddits::create_subreddit),
        )
        .route("/subreddit/{id}", get(subreddits::get_subreddit))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/{id}", get(posts::get_post))
        .route(
            "/posts/by-subreddit/{id}",
            get(posts::list_posts_by_subreddit),
        )
        .route(
            "/posts/by-user/{username}",
            get(posts::list_posts_by_user),
        )
        .route("/comments", post(comments::create_comment))
        .route(
            "/comments/by-post/{post_id}",
            get(comments::list_comments_by_post),
        )
        .route(
            "/comments/by-user/{username}",
            get(comments::list_comments_by_user),
        )
        .route("/votes", post(votes::vote))
        .route("/system/status", get(system::get_status))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
