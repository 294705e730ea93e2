mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use agora_types::api::Claims;

use common::{SECRET, TestApp};

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new("health");
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, _) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_malformed_header_is_auth_missing() {
    let app = TestApp::new("auth_missing");

    let (status, body) = app.send(Method::GET, "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_missing");

    let request = Request::get("/api/user")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_missing");
}

#[tokio::test]
async fn bad_signature_is_auth_invalid() {
    let app = TestApp::new("auth_invalid");

    let (status, body) = app.send(Method::GET, "/api/user", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_invalid");

    let claims = Claims { user_id: 1, exp: 4_102_444_800 };
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"wrong")).unwrap();
    let (status, body) = app.send(Method::GET, "/api/user", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_invalid");
}

#[tokio::test]
async fn expired_token_is_rejected_even_when_correctly_signed() {
    let app = TestApp::new("auth_expired");
    let (user_id, _) = app.user("late");

    let exp = (chrono::Utc::now().timestamp() - 60) as usize;
    let claims = Claims { user_id, exp };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

    let (status, body) = app.send(Method::GET, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_invalid");
}

#[tokio::test]
async fn token_is_checked_before_the_path_id() {
    let app = TestApp::new("auth_order");
    let (status, body) = app.send(Method::POST, "/api/posts/abc/like", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_missing");
}

#[tokio::test]
async fn register_login_and_profile_flow() {
    let app = TestApp::new("register");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "nickname": "ann", "email": "ann@example.com", "password": "hunter22!" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["nickname"], "ann");
    assert!(body["user"].get("password_hash").is_none());
    let user_id = body["user"]["id"].as_i64().unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id);

    // Same email again
    let (status, body) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "nickname": "ann2", "email": "ann@example.com", "password": "hunter22!" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "hunter22!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id);
    assert!(body["token"].is_string());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_invalid");
}

#[tokio::test]
async fn malformed_registration_body_is_bad_request() {
    let app = TestApp::new("register_bad");

    let (status, body) = app
        .send(Method::POST, "/api/users", None, Some(json!({ "nickname": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "nickname": "x", "email": "not-an-email", "password": "longenough" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_update_and_self_delete() {
    let app = TestApp::new("profile");
    let (user_id, token) = app.user("bob");

    let (status, body) = app
        .send(Method::PUT, "/api/user", Some(&token), Some(json!({ "nickname": "robert", "email": "" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "robert");
    assert_eq!(body["email"], "bob@example.com");

    let (status, _) = app.send(Method::DELETE, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The token still verifies, but the identity is gone
    let (status, body) = app
        .send(Method::GET, &format!("/api/users/{user_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
