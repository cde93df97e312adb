//! Shared helpers for Web API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use college::db::UserRepository;
use college::file::FileStorage;
use college::web::{create_router, AppState};
use college::{Config, Database, Permissions};

/// Password used for every test account.
pub const PASSWORD: &str = "secret123";

/// Seeded major used by application tests.
pub const MAJOR_ID: &str = "0190f0a6-b1c4-7a3e-9f2b-6d1c8e4a5b01";

/// A running test server and the database behind it.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub files: TempDir,
}

/// Create a test server with default configuration.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(Config::default()).await
}

/// Create a test server with an in-memory database and a temporary upload
/// directory.
pub async fn create_test_app_with(config: Config) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let files = TempDir::new().expect("Failed to create upload directory");
    let storage = FileStorage::new(files.path()).expect("Failed to create file storage");

    let app_state = Arc::new(AppState::new(db.clone(), storage, &config));
    let router = create_router(app_state, &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db, files }
}

/// A valid registration body for `username`.
pub fn registration_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": PASSWORD,
        "email": format!("{username}@example.com"),
        "tel": "+79991234567",
        "firstName": "Ivan",
        "middleName": "Petrovich",
        "lastName": "Sidorov",
        "birthday": "2006-03-14",
        "genderId": 1,
        "needsDorm": true
    })
}

/// Register a user and return its id.
pub async fn register(server: &TestServer, username: &str) -> Uuid {
    let response = server.post("/users").json(&registration_body(username)).await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("registration response has no id")
}

/// Log in and return the token response body.
pub async fn login(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/tokens")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Register and log in, returning the user id and the raw secret.
pub async fn register_and_login(server: &TestServer, username: &str) -> (Uuid, String) {
    let id = register(server, username).await;
    let token = login(server, username).await;
    let secret = token["token"]
        .as_str()
        .expect("token response has no secret")
        .to_string();
    (id, secret)
}

/// `Authorization` header value for a secret.
pub fn bearer(secret: &str) -> String {
    format!("Bearer {secret}")
}

/// Replace a user's permission mask.
pub async fn grant(db: &Database, user_id: Uuid, permissions: Permissions) {
    let updated = UserRepository::new(db.pool())
        .set_permissions(user_id, permissions)
        .await
        .expect("Failed to set permissions");
    assert!(updated);
}
