use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use agora::config::Config;

async fn spawn_app() -> (Router, Arc<agora::api::AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory DB.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = agora::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = agora::api::router(state.clone()).await;

    (app, state)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_and_login(
    app: &Router,
    state: &Arc<agora::api::AppState>,
    username: &str,
) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            &serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = state
        .store()
        .get_user_by_username(username)
        .await
        .unwrap()
        .expect("user should exist after signup");
    let token = state
        .store()
        .latest_verification_token_for_user(user.id)
        .await
        .unwrap()
        .expect("verification token should be outstanding");

    app.clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/account-verification/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({"username": username, "password": "password123"}),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    body["data"]["authentication_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a subreddit and one post, returning the post id.
async fn seed_post(app: &Router, token: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/subreddit",
            token,
            &serde_json::json!({"name": "memes", "description": "only the finest"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/posts",
            token,
            &serde_json::json!({
                "name": "a fine meme",
                "url": "https://example.com/meme",
                "subreddit_name": "memes",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

async fn vote(app: &Router, token: &str, post_id: i64, direction: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/votes",
            token,
            &serde_json::json!({"post_id": post_id, "direction": direction}),
        ))
        .await
        .unwrap();

    response.status()
}

async fn vote_count(app: &Router, post_id: i64) -> i64 {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/posts/{post_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    body["data"]["vote_count"].as_i64().unwrap()
}

#[tokio::test]
async fn duplicate_same_direction_vote_is_rejected() {
    let (app, state) = spawn_app().await;
    let token = register_and_login(&app, &state, "alice").await;
    let post_id = seed_post(&app, &token).await;

    assert_eq!(vote(&app, &token, post_id, "up").await, StatusCode::OK);
    assert_eq!(vote_count(&app, post_id).await, 1);

    // Same direction again: rejected, counter untouched.
    assert_eq!(
        vote(&app, &token, post_id, "up").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(vote_count(&app, post_id).await, 1);
}

#[tokio::test]
async fn direction_flip_moves_counter_one_unit() {
    let (app, state) = spawn_app().await;
    let token = register_and_login(&app, &state, "bob").await;
    let post_id = seed_post(&app, &token).await;

    assert_eq!(vote(&app, &token, post_id, "up").await, StatusCode::OK);
    assert_eq!(vote_count(&app, post_id).await, 1);

    // Flip: one unit down, no compensation for the prior upvote.
    assert_eq!(vote(&app, &token, post_id, "down").await, StatusCode::OK);
    assert_eq!(vote_count(&app, post_id).await, 0);

    // The effective vote is now "down"; repeating it is rejected.
    assert_eq!(
        vote(&app, &token, post_id, "down").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(vote_count(&app, post_id).await, 0);

    assert_eq!(vote(&app, &token, post_id, "up").await, StatusCode::OK);
    assert_eq!(vote_count(&app, post_id).await, 1);
}

#[tokio::test]
async fn votes_are_scoped_per_user() {
    let (app, state) = spawn_app().await;
    let alice = register_and_login(&app, &state, "alice").await;
    let bob = register_and_login(&app, &state, "bob").await;
    let post_id = seed_post(&app, &alice).await;

    assert_eq!(vote(&app, &alice, post_id, "up").await, StatusCode::OK);

    // Bob's first upvote is not a duplicate of Alice's.
    assert_eq!(vote(&app, &bob, post_id, "up").await, StatusCode::OK);
    assert_eq!(vote_count(&app, post_id).await, 2);
}

#[tokio::test]
async fn vote_flags_follow_the_effective_vote() {
    let (app, state) = spawn_app().await;
    let alice = register_and_login(&app, &state, "alice").await;
    let bob = register_and_login(&app, &state, "bob").await;
    let post_id = seed_post(&app, &alice).await;

    assert_eq!(vote(&app, &alice, post_id, "up").await, StatusCode::OK);

    // Alice sees her own upvote.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/posts/{post_id}"))
                .header("Authorization", format!("Bearer {alice}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["up_vote"], true);
    assert_eq!(body["data"]["down_vote"], false);

    // Bob has not voted; both flags are down for him.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/posts/{post_id}"))
                .header("Authorization", format!("Bearer {bob}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["up_vote"], false);
    assert_eq!(body["data"]["down_vote"], false);

    // After a flip the flags follow the most recent row.
    assert_eq!(vote(&app, &alice, post_id, "down").await, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/posts/{post_id}"))
                .header("Authorization", format!("Bearer {alice}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["up_vote"], false);
    assert_eq!(body["data"]["down_vote"], true);
}

#[tokio::test]
async fn voting_needs_an_existing_post_and_a_caller() {
    let (app, state) = spawn_app().await;
    let token = register_and_login(&app, &state, "carol").await;

    assert_eq!(
        vote(&app, &token, 9999, "up").await,
        StatusCode::NOT_FOUND
    );

    let post_id = seed_post(&app, &token).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/votes",
            &serde_json::json!({"post_id": post_id, "direction": "up"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
