//! Tests for token and session authentication

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use kinship_server::{
    api::auth::{Claims, generate_jwt_token, hash_password},
    config::ServerConfig,
    state::AppState,
};
use serde_json::{Value, json};

/// Lowest bcrypt cost (bcrypt keeps its own `MIN_COST` private)
const MIN_COST: u32 = 4;

const SECRET: &str = "test-secret-key-for-jwt-token-generation";

async fn create_test_server() -> (TestServer, Arc<AppState>) {
    let config = kinship::config::ConfigBuilder::testing()
        .build()
        .expect("Failed to create config");
    let kinship = kinship::init(config)
        .await
        .expect("Failed to initialize kinship");

    let server_config = ServerConfig {
        jwt_secret: SECRET.to_string(),
        password_cost: MIN_COST,
        ..ServerConfig::default()
    };

    let state = Arc::new(AppState::new(kinship, server_config));
    let server = TestServer::new(kinship_server::create_router(state.clone()))
        .expect("Failed to create test server");

    (server, state)
}

/// Create a user directly through the library, bypassing the API
async fn create_user(state: &AppState, username: &str) -> String {
    let hash = hash_password("password", MIN_COST).unwrap();
    state.kinship.users().create(username, &hash).await.unwrap().id
}

#[tokio::test]
async fn test_login_token_carries_session() {
    let (server, state) = create_test_server().await;
    let user_id = create_user(&state, "alice").await;

    let response = server
        .post("/api/login")
        .json(&json!({ "username": "alice", "password": "password" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let token = body["token"].as_str().unwrap();
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET.as_ref()),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(claims.sub, user_id);
    let session = state.kinship.sessions().validate(&claims.sid).await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert!(claims.exp > Utc::now().timestamp() as usize);
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let (server, state) = create_test_server().await;
    let user_id = create_user(&state, "alice").await;
    let session = state
        .kinship
        .sessions()
        .start(&user_id, Duration::hours(1))
        .await
        .unwrap();

    let forged =
        generate_jwt_token(&user_id, &session.id, "another-secret", session.expires_at).unwrap();

    let response = server.get("/api/session").authorization_bearer(&forged).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "unauthenticated");
}

#[tokio::test]
async fn test_token_without_session() {
    let (server, state) = create_test_server().await;
    let user_id = create_user(&state, "alice").await;

    let token = generate_jwt_token(
        &user_id,
        "no-such-session",
        SECRET,
        Utc::now() + Duration::hours(1),
    )
    .unwrap();

    server
        .get("/api/session")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_other_users_session() {
    let (server, state) = create_test_server().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;
    let session = state
        .kinship
        .sessions()
        .start(&bob, Duration::hours(1))
        .await
        .unwrap();

    let token = generate_jwt_token(&alice, &session.id, SECRET, session.expires_at).unwrap();

    server
        .get("/api/session")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token() {
    let (server, state) = create_test_server().await;
    let user_id = create_user(&state, "alice").await;
    let session = state
        .kinship
        .sessions()
        .start(&user_id, Duration::hours(1))
        .await
        .unwrap();

    let token = generate_jwt_token(
        &user_id,
        &session.id,
        SECRET,
        Utc::now() - Duration::hours(2),
    )
    .unwrap();

    server
        .get("/api/session")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_on_public_endpoint_is_ignored() {
    let (server, _state) = create_test_server().await;

    server
        .get("/api/health")
        .authorization_bearer("not-a-jwt")
        .await
        .assert_status_ok();

    server
        .post("/api/users")
        .authorization_bearer("not-a-jwt")
        .json(&json!({ "username": "alice", "password": "password" }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_public_docs_need_no_token() {
    let (server, _state) = create_test_server().await;

    server.get("/api-docs/openapi.json").await.assert_status_ok();
}

#[tokio::test]
async fn test_anonymous_reads_and_notifications() {
    let (server, state) = create_test_server().await;
    let alice = create_user(&state, "alice").await;
    state
        .kinship
        .posts()
        .create(&alice, "hello world", None)
        .await
        .unwrap();

    let users: Vec<Value> = server.get("/api/users").await.json();
    assert_eq!(users.len(), 1);

    let user: Value = server.get("/api/users/alice").await.json();
    assert_eq!(user["username"], "alice");

    let posts: Vec<Value> = server.get("/api/posts").add_query_param("author", "alice").await.json();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["author"], "alice");

    let found: Vec<Value> = server.get("/api/search").add_query_param("search", "hello").await.json();
    assert_eq!(found.len(), 1);

    server
        .post("/api/notifications/alice")
        .json(&json!({ "content": "hi alice" }))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(
        state.kinship.notifications().get_unread(&alice).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_private_endpoints_still_need_a_token() {
    let (server, state) = create_test_server().await;
    create_user(&state, "alice").await;

    for path in [
        "/api/notifications",
        "/api/users/alice/restrictions",
        "/api/users/alice/screentime/feed",
        "/api/follow",
    ] {
        server.get(path).await.assert_status(StatusCode::UNAUTHORIZED);
    }

    server
        .post("/api/posts")
        .json(&json!({ "content": "anonymous" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
