//! Web API Authentication Tests
//!
//! Registration, login, credential transports and logout.

mod common;

use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use serde_json::{json, Value};

use common::{bearer, create_test_app, register, register_and_login, registration_body, PASSWORD};

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/users")
        .json(&registration_body("applicant"))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["username"], "applicant");
    assert_eq!(body["email"], "applicant@example.com");
    assert_eq!(body["permissions"], "0");
    assert_eq!(body["isVerified"], false);
    assert_eq!(body["details"]["firstName"], "Ivan");
    assert_eq!(body["details"]["birthday"], "2006-03-14");
    assert_eq!(body["details"]["needsDorm"], true);
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = create_test_app().await;
    register(&app.server, "applicant").await;

    let mut body = registration_body("applicant");
    body["email"] = json!("other@example.com");
    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "this email or username is already taken");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app().await;
    register(&app.server, "applicant").await;

    let mut body = registration_body("another");
    body["email"] = json!("applicant@example.com");
    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_details() {
    let app = create_test_app().await;

    let mut body = registration_body("applicant");
    body["username"] = json!("ab");
    body["tel"] = json!("89991234567");
    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Request body is invalid");
    assert_eq!(
        body["details"],
        json!([
            {"field": "tel", "tag": "e164"},
            {"field": "username", "tag": "gte", "param": "4"}
        ])
    );
}

#[tokio::test]
async fn test_register_unknown_gender() {
    let app = create_test_app().await;

    let mut body = registration_body("applicant");
    body["genderId"] = json!(99);
    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    // Nothing was written
    let response = app
        .server
        .post("/tokens")
        .json(&json!({"username": "applicant", "password": PASSWORD}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/users")
        .text("{\"username\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request body contains malformed json");
}

#[tokio::test]
async fn test_register_unknown_field() {
    let app = create_test_app().await;

    let mut body = registration_body("applicant");
    body["permissions"] = json!("8");
    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app().await;
    let id = register(&app.server, "applicant").await;

    let response = app
        .server
        .post("/tokens")
        .json(&json!({"username": "applicant", "password": PASSWORD}))
        .await;

    response.assert_status_ok();
    assert!(response.headers().get(SET_COOKIE).is_none());

    let body: Value = response.json();
    assert_eq!(body["userId"], id.to_string());
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
    assert!(body["expiresAt"].is_string());

    // 72 random bytes, base64 encoded
    assert_eq!(body["token"].as_str().unwrap().len(), 96);
}

#[tokio::test]
async fn test_login_tokens_are_distinct() {
    let app = create_test_app().await;
    register(&app.server, "applicant").await;

    let a = common::login(&app.server, "applicant").await;
    let b = common::login(&app.server, "applicant").await;
    assert_ne!(a["token"], b["token"]);
    assert_ne!(a["id"], b["id"]);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    register(&app.server, "applicant").await;

    let response = app
        .server
        .post("/tokens")
        .json(&json!({"username": "applicant", "password": "wrongpassword"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/tokens")
        .json(&json!({"username": "nobody", "password": PASSWORD}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_sets_cookie() {
    let app = create_test_app().await;
    register(&app.server, "applicant").await;

    let response = app
        .server
        .post("/tokens?cookie=true")
        .json(&json!({"username": "applicant", "password": PASSWORD}))
        .await;

    response.assert_status_ok();
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("no Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string();

    assert!(cookie.starts_with("token=Bearer"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age="));
    assert!(!cookie.contains("Secure"));
}

// ============================================================================
// Credential Transport Tests
// ============================================================================

#[tokio::test]
async fn test_header_credential() {
    let app = create_test_app().await;
    let (id, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .get("/users/@me")
        .add_header(AUTHORIZATION, bearer(&secret))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn test_cookie_credential() {
    let app = create_test_app().await;
    let (id, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .get("/users/@me")
        .add_header(COOKIE, format!("token={}", bearer(&secret)))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_header() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    // Bad cookie, good header: only the cookie is consulted
    let response = app
        .server
        .get("/users/@me")
        .add_header(COOKIE, "token=Bearer%20unknown")
        .add_header(AUTHORIZATION, bearer(&secret))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_cookie_falls_back_to_header() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .get("/users/@me")
        .add_header(COOKIE, "token=")
        .add_header(AUTHORIZATION, bearer(&secret))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_rejected_credentials_look_alike() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let missing = app.server.get("/users/@me").await;
    let malformed = app
        .server
        .get("/users/@me")
        .add_header(AUTHORIZATION, secret.clone())
        .await;
    let unknown = app
        .server
        .get("/users/@me")
        .add_header(AUTHORIZATION, bearer("not-a-real-token"))
        .await;

    for response in [missing, malformed, unknown] {
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body, json!({"status": 401, "message": "Unauthorized"}));
    }
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .delete("/tokens")
        .add_header(AUTHORIZATION, bearer(&secret))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"deleted": true}));

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("cookie not cleared")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));

    app.server
        .get("/users/@me")
        .add_header(AUTHORIZATION, bearer(&secret))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_leaves_other_sessions() {
    let app = create_test_app().await;
    let (_, first) = register_and_login(&app.server, "applicant").await;
    let second = common::login(&app.server, "applicant").await;
    let second = second["token"].as_str().unwrap().to_string();

    app.server
        .delete("/tokens")
        .add_header(AUTHORIZATION, bearer(&first))
        .await
        .assert_status_ok();

    app.server
        .get("/users/@me")
        .add_header(AUTHORIZATION, bearer(&second))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_logout_without_token() {
    let app = create_test_app().await;

    let response = app.server.delete("/tokens").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "authentication token not attached to the request"
    );
}

#[tokio::test]
async fn test_logout_invalid_token() {
    let app = create_test_app().await;

    for value in [bearer("unknown"), "unknown".to_string()] {
        let response = app
            .server
            .delete("/tokens")
            .add_header(AUTHORIZATION, value)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "invalid token");
    }
}

#[tokio::test]
async fn test_logout_non_ascii_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .delete("/tokens")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "invalid token");
}
