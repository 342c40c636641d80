use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{comments, posts, subreddits, verification_tokens, votes};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn subreddit_repo(&self) -> repositories::subreddit::SubredditRepository {
        repositories::subreddit::SubredditRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn vote_repo(&self) -> repositories::vote::VoteRepository {
        repositories::vote::VoteRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.user_repo().get_by_ids(ids).await
    }

    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().exists(username, email).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn set_user_enabled(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.user_repo().set_enabled(user_id, enabled).await
    }

    pub async fn user_count(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Tokens ==========

    pub async fn create_verification_token(&self, user_id: i64) -> Result<String> {
        self.token_repo().create_verification_token(user_id).await
    }

    pub async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<verification_tokens::Model>> {
        self.token_repo().find_verification_token(token).await
    }

    pub async fn delete_verification_token(&self, id: i64) -> Result<()> {
        self.token_repo().delete_verification_token(id).await
    }

    pub async fn latest_verification_token_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<String>> {
        self.token_repo()
            .latest_verification_token_for_user(user_id)
            .await
    }

    pub async fn create_refresh_token(&self) -> Result<String> {
        self.token_repo().create_refresh_token().await
    }

    pub async fn refresh_token_exists(&self, token: &str) -> Result<bool> {
        self.token_repo().refresh_token_exists(token).await
    }

    pub async fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        self.token_repo().delete_refresh_token(token).await
    }

    // ========== Subreddits ==========

    pub async fn create_subreddit(
        &self,
        name: &str,
        description: &str,
    ) -> Result<subreddits::Model> {
        self.subreddit_repo().create(name, description).await
    }

    pub async fn get_subreddit(&self, id: i64) -> Result<Option<subreddits::Model>> {
        self.subreddit_repo().get(id).await
    }

    pub async fn get_subreddits_by_ids(&self, ids: &[i64]) -> Result<Vec<subreddits::Model>> {
        self.subreddit_repo().get_by_ids(ids).await
    }

    pub async fn get_subreddit_by_name(&self, name: &str) -> Result<Option<subreddits::Model>> {
        self.subreddit_repo().get_by_name(name).await
    }

    pub async fn list_subreddits(&self) -> Result<Vec<subreddits::Model>> {
        self.subreddit_repo().list_all().await
    }

    pub async fn subreddit_post_counts(&self, ids: &[i64]) -> Result<HashMap<i64, i64>> {
        self.subreddit_repo().post_counts(ids).await
    }

    pub async fn subreddit_count(&self) -> Result<u64> {
        self.subreddit_repo().count().await
    }

    // ========== Posts ==========

    pub async fn create_post(
        &self,
        name: &str,
        url: Option<&str>,
        description: Option<&str>,
        user_id: i64,
        subreddit_id: i64,
    ) -> Result<posts::Model> {
        self.post_repo()
            .create(name, url, description, user_id, subreddit_id)
            .await
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<posts::Model>> {
        self.post_repo().get(id).await
    }

    pub async fn list_posts(&self) -> Result<Vec<posts::Model>> {
        self.post_repo().list_all().await
    }

    pub async fn list_posts_by_subreddit(&self, subreddit_id: i64) -> Result<Vec<posts::Model>> {
        self.post_repo().list_by_subreddit(subreddit_id).await
    }

    pub async fn list_posts_by_user(&self, user_id: i64) -> Result<Vec<posts::Model>> {
        self.post_repo().list_by_user(user_id).await
    }

    pub async fn adjust_post_vote_count(&self, post_id: i64, delta: i64) -> Result<()> {
        self.post_repo().adjust_vote_count(post_id, delta).await
    }

    pub async fn post_count(&self) -> Result<u64> {
        self.post_repo().count().await
    }

    // ========== Comments ==========

    pub async fn create_comment(
        &self,
        text: &str,
        user_id: i64,
        post_id: i64,
    ) -> Result<comments::Model> {
        self.comment_repo().create(text, user_id, post_id).await
    }

    pub async fn list_comments_by_post(&self, post_id: i64) -> Result<Vec<comments::Model>> {
        self.comment_repo().list_by_post(post_id).await
    }

    pub async fn list_comments_by_user(&self, user_id: i64) -> Result<Vec<comments::Model>> {
        self.comment_repo().list_by_user(user_id).await
    }

    pub async fn comment_counts_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        self.comment_repo().counts_for_posts(post_ids).await
    }

    pub async fn comment_count(&self) -> Result<u64> {
        self.comment_repo().count().await
    }

    // ========== Votes ==========

    pub async fn insert_vote(&self, post_id: i64, user_id: i64, direction: i16) -> Result<()> {
        self.vote_repo().insert(post_id, user_id, direction).await
    }

    pub async fn latest_vote(&self, post_id: i64, user_id: i64) -> Result<Option<votes::Model>> {
        self.vote_repo().latest_for(post_id, user_id).await
    }

    pub async fn latest_votes_for_posts(
        &self,
        post_ids: &[i64],
        user_id: i64,
    ) -> Result<HashMap<i64, i16>> {
        self.vote_repo().latest_for_posts(post_ids, user_id).await
    }
}
