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

/// Signup, verify, and login in one go; returns an access token.
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

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/account-verification/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({"username": username, "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["authentication_token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn protected_endpoints_require_bearer_token() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/subreddit",
            &serde_json::json!({"name": "rust", "description": "all things rust"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/subreddit",
            "garbage-token",
            &serde_json::json!({"name": "rust", "description": "all things rust"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn subreddit_crud_flow() {
    let (app, state) = spawn_app().await;
    let token = register_and_login(&app, &state, "alice").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/subreddit",
            &token,
            &serde_json::json!({"name": "rust", "description": "all things rust"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let subreddit_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["name"], "rust");
    assert_eq!(body["data"]["number_of_posts"], 0);

    // Names are unique.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/subreddit",
            &token,
            &serde_json::json!({"name": "rust", "description": "duplicate"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/subreddit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/subreddit/{subreddit_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/subreddit/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_and_comment_flow() {
    let (app, state) = spawn_app().await;
    let token = register_and_login(&app, &state, "bob").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/subreddit",
            &token,
            &serde_json::json!({"name": "news", "description": "front page"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let subreddit_id = body["data"]["id"].as_i64().unwrap();

    // Posting into an unknown subreddit fails.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/posts",
            &token,
            &serde_json::json!({
                "name": "hello",
                "subreddit_name": "no-such-subreddit",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/posts",
            &token,
            &serde_json::json!({
                "name": "hello world",
                "url": "https://example.com/article",
                "description": "first post",
                "subreddit_name": "news",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let post_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["user_name"], "bob");
    assert_eq!(body["data"]["subreddit_name"], "news");
    assert_eq!(body["data"]["vote_count"], 0);
    assert_eq!(body["data"]["comment_count"], 0);
    assert!(body["data"]["duration"].is_string());

    // Anonymous read works and carries no vote flags.
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
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["up_vote"], false);
    assert_eq!(body["data"]["down_vote"], false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/posts/by-subreddit/{subreddit_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts/by-user/bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts/by-user/nobody")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Comments require auth and an existing post.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/comments",
            &serde_json::json!({"post_id": post_id, "text": "nice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/comments",
            &token,
            &serde_json::json!({"post_id": 9999, "text": "nice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/comments",
            &token,
            &serde_json::json!({"post_id": post_id, "text": "nice article"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user_name"], "bob");
    assert_eq!(body["data"]["post_id"], post_id);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/comments/by-post/{post_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments/by-user/bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The post now reports one comment, the subreddit one post.
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
    assert_eq!(body["data"]["comment_count"], 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/subreddit/{subreddit_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["number_of_posts"], 1);
}

#[tokio::test]
async fn system_endpoints_report_state() {
    let (app, state) = spawn_app().await;
    let _token = register_and_login(&app, &state, "carol").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["users"], 1);
    assert!(body["data"]["version"].is_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["ready"], true);
}
