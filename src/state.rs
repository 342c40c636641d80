use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::JwtProvider;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CommentService, LogMailer, Mailer, PostService, SeaOrmAuthService,
    SeaOrmCommentService, SeaOrmPostService, SeaOrmSubredditService, SeaOrmVoteService,
    SubredditService, VoteService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub subreddit_service: Arc<dyn SubredditService>,

    pub post_service: Arc<dyn PostService>,

    pub comment_service: Arc<dyn CommentService>,

    pub vote_service: Arc<dyn VoteService>,

    pub mailer: Arc<dyn Mailer>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
        Self::with_mailer(config, mailer).await
    }

    /// Same bootstrap with a caller-provided mail sink (tests use this to
    /// capture outbound notifications).
    pub async fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let jwt = JwtProvider::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_minutes,
        );

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            jwt,
            mailer.clone(),
            config.security.clone(),
            config.auth.verification_base_url.clone(),
        )) as Arc<dyn AuthService>;

        let subreddit_service =
            Arc::new(SeaOrmSubredditService::new(store.clone())) as Arc<dyn SubredditService>;

        let post_service = Arc::new(SeaOrmPostService::new(store.clone())) as Arc<dyn PostService>;

        let comment_service = Arc::new(SeaOrmCommentService::new(store.clone(), mailer.clone()))
            as Arc<dyn CommentService>;

        let vote_service = Arc::new(SeaOrmVoteService::new(store.clone())) as Arc<dyn VoteService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            subreddit_service,
            post_service,
            comment_service,
            vote_service,
            mailer,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
