//! Integration tests for the authentication flow.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use crate::helpers::{TEST_SECRET, TestApp, field};

#[tokio::test]
async fn test_register_then_duplicate() {
    let app = TestApp::new();
    let id = app.register("a@x.com", "pw1").await;
    assert!(id > 0);

    let response = app
        .request(
            "POST",
            "/api/register",
            Some(json!({ "email": "a@x.com", "password": "pw1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let bad_email = app
        .request(
            "POST",
            "/api/register",
            Some(json!({ "email": "not-an-email", "password": "pw1" })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), "VALIDATION");

    let short_password = app
        .request(
            "POST",
            "/api/register",
            Some(json!({ "email": "b@x.com", "password": "pw" })),
            None,
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let malformed = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.register("c@x.com", "pw1").await;

    let body = app.login("c@x.com", "pw1", "d1").await;
    assert!(body.get("access_token").is_some());
    assert!(body.get("refresh_token").is_some());
    assert!(body.get("access_expires_at").is_some());
    assert_eq!(app.store.refresh_token_count(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("d@x.com", "pw1").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "d@x.com", "password": "nope", "device_id": "d1" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "ghost@x.com", "password": "pw1", "device_id": "d1" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_requires_device_id() {
    let app = TestApp::new();
    app.register("e@x.com", "pw1").await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "e@x.com", "password": "pw1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_scenario() {
    let app = TestApp::new();
    app.register("a@x.com", "pw1").await;

    let t1 = app.login("a@x.com", "pw1", "d1").await;

    let refreshed = app.refresh(field(&t1, "refresh_token"), "d1").await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let t2 = refreshed.body;

    let replay = app.refresh(field(&t1, "refresh_token"), "d1").await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_code(), "INVALID_REFRESH_TOKEN");

    let _t3 = app.login("a@x.com", "pw1", "d1").await;
    let superseded = app.refresh(field(&t2, "refresh_token"), "d1").await;
    assert_eq!(superseded.status, StatusCode::UNAUTHORIZED);
    assert_eq!(superseded.error_code(), "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_refresh_rejects_other_device() {
    let app = TestApp::new();
    app.register("f@x.com", "pw1").await;
    let pair = app.login("f@x.com", "pw1", "phone").await;

    let response = app.refresh(field(&pair, "refresh_token"), "laptop").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_me_requires_valid_bearer() {
    let app = TestApp::new();
    let id = app.register("g@x.com", "pw1").await;
    let pair = app.login("g@x.com", "pw1", "d1").await;

    let me = app
        .request("GET", "/api/me", None, Some(field(&pair, "access_token")))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], json!(id));
    assert_eq!(me.body["email"], json!("g@x.com"));
    assert!(me.body.get("password_hash").is_none());

    let missing = app.request("GET", "/api/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "INVALID_ACCESS_TOKEN");

    let garbage = app.request("GET", "/api/me", None, Some("garbage")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.error_code(), "INVALID_ACCESS_TOKEN");

    // A refresh token is not an access token.
    let wrong_type = app
        .request("GET", "/api/me", None, Some(field(&pair, "refresh_token")))
        .await;
    assert_eq!(wrong_type.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_reported_distinctly() {
    let app = TestApp::new();
    let id = app.register("h@x.com", "pw1").await;

    let past = Utc::now().timestamp() - 3_600;
    let expired = encode(
        &Header::default(),
        &json!({ "sub": id, "iat": past - 60, "exp": past, "token_type": "access" }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app.request("GET", "/api/me", None, Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::new();
    app.register("i@x.com", "pw1").await;
    let pair = app.login("i@x.com", "pw1", "d1").await;
    let access = field(&pair, "access_token");

    for _ in 0..2 {
        let response = app
            .request("POST", "/api/logout", Some(json!({ "device_id": "d1" })), Some(access))
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }
    assert_eq!(app.store.refresh_token_count(), 0);

    let refresh = app.refresh(field(&pair, "refresh_token"), "d1").await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_auth() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/logout", Some(json!({ "device_id": "d1" })), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], json!("ok"));
    assert_eq!(response.body["database"], json!("connected"));
}
