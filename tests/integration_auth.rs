mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use common::{TEST_PASSWORD, TEST_TTL, TestApp, generate_unique_email};
use pennywise::pennywise_auth::decode_claims_unverified;
use pennywise::pennywise_core::Role;
use serde_json::json;

async fn register(app: &TestApp, email: &str) -> (StatusCode, serde_json::Value) {
    app.send(
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ana",
            "email": email,
            "password": TEST_PASSWORD
        })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/auth/register"));
    assert!(paths.contains_key("/api/auth/login"));
    assert!(paths.contains_key("/api/auth/profile"));
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();
    let email = generate_unique_email();

    let (status, body) = register(&app, &format!("  {} ", email.to_uppercase())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "   ",
                "email": "not-an-email",
                "password": "123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ana", "email": "ana@example.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "password");
}

#[tokio::test]
async fn test_register_without_json_content_type() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .body(Body::from(r#"{"name":"Ana"}"#))
        .unwrap();

    let (status, body) = app.send_request(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    let email = generate_unique_email();
    register(&app, &email).await;

    let (status, body) = register(&app, &email.to_uppercase()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "An account with this email already exists");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let email = generate_unique_email();
    let (_, registered) = register(&app, &email).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email.to_uppercase(), "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], registered["data"]["id"]);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let email = generate_unique_email();
    register(&app, &email).await;

    let (wrong_status, wrong_body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "wrong-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": generate_unique_email(), "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_profile_with_token() {
    let app = TestApp::new();
    let email = generate_unique_email();
    let (_, registered) = register(&app, &email).await;
    let token = registered["token"].as_str().unwrap();

    let (status, body) = app.send("GET", "/api/auth/profile", Some(token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_without_token() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/auth/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_profile_with_wrong_scheme() {
    let app = TestApp::new();
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;
    let request = Request::builder()
        .uri("/api/auth/profile")
        .header("authorization", format!("Token {token}"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send_request(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_profile_with_tampered_token() {
    let app = TestApp::new();
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;
    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);

    let (status, body) = app
        .send("GET", "/api/auth/profile", Some(&tampered), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_profile_with_expired_token() {
    let app = TestApp::new();
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;

    app.clock.advance(Duration::seconds(TEST_TTL - 1));
    let (status, _) = app.send("GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::seconds(1));
    let (status, body) = app.send("GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_token_for_removed_account_is_rejected() {
    let app = TestApp::new();
    let token = app.tokens.issue(uuid::Uuid::new_v4()).unwrap();

    let (status, body) = app.send("GET", "/api/auth/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_update_profile_keeps_password() {
    let app = TestApp::new();
    let (account, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;
    let new_email = generate_unique_email();

    let (status, body) = app
        .send(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(json!({ "name": "Ana Maria", "email": new_email.to_uppercase() })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana Maria");
    assert_eq!(body["data"]["email"], new_email);
    assert_eq!(body["data"]["id"], account.id.to_string());

    let (status, _) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": new_email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_partial() {
    let app = TestApp::new();
    let email = generate_unique_email();
    let (_, token) = app.create_account(&email, Role::User, &[]).await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(json!({ "name": "Bo" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bo");
    assert_eq!(body["data"]["email"], email);
}

#[tokio::test]
async fn test_update_profile_to_taken_email() {
    let app = TestApp::new();
    let taken = generate_unique_email();
    app.create_account(&taken, Role::User, &[]).await;
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;

    let (status, _) = app
        .send(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(json!({ "email": taken })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_profile_rejects_invalid_email() {
    let app = TestApp::new();
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(json!({ "email": "nope" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let email = generate_unique_email();
    let (_, token) = app.create_account(&email, Role::User, &[]).await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/auth/password",
            Some(&token),
            Some(json!({ "current_password": TEST_PASSWORD, "new_password": "secret2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");

    let (old, _) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": TEST_PASSWORD })),
        )
        .await;
    let (new, _) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret2" })),
        )
        .await;
    assert_eq!(old, StatusCode::UNAUTHORIZED);
    assert_eq!(new, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let app = TestApp::new();
    let (_, token) = app
        .create_account(&generate_unique_email(), Role::User, &[])
        .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/auth/password",
            Some(&token),
            Some(json!({ "current_password": "wrong-one", "new_password": "secret2" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "current_password");
}

#[tokio::test]
async fn test_change_password_requires_token() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            "PUT",
            "/api/auth/password",
            None,
            Some(json!({ "current_password": TEST_PASSWORD, "new_password": "secret2" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login_with_lowercased_email() {
    let app = TestApp::new();

    let (status, registered) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ana", "email": "Ana@X.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let claims = decode_claims_unverified(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(registered["data"]["id"], claims.sub);
    assert_eq!(body["data"]["id"], claims.sub);
}
