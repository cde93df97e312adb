//! Web API File Upload Tests

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;

use college::Config;
use common::{bearer, create_test_app, create_test_app_with, register_and_login};

fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

fn attachment(content: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(content).file_name(file_name).mime_type(mime_type);
    MultipartForm::new().add_part("attachment", part)
}

#[tokio::test]
async fn test_upload_png() {
    let app = create_test_app().await;
    let (id, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .multipart(attachment(png_bytes(), "scan.png", "image/png"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["userId"], id.to_string());
    assert_eq!(body["mimeType"], "image/png");
    assert_eq!(body["sha256"].as_str().unwrap().len(), 64);
    assert!(body.get("absolutePath").is_none());

    let stored: Vec<_> = std::fs::read_dir(app.files.path().join(id.to_string()))
        .unwrap()
        .collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_upload_jpeg_with_wrong_declared_type() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    // Content decides, not the declared type
    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .multipart(attachment(jpeg_bytes(), "scan.bin", "application/octet-stream"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["mimeType"], "image/jpeg");
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let app = create_test_app().await;
    let (id, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .multipart(attachment(b"plain text".to_vec(), "scan.png", "image/png"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request body contains malformed form data");
    assert!(!app.files.path().join(id.to_string()).exists());
}

#[tokio::test]
async fn test_upload_missing_attachment() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let app = create_test_app().await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .json(&serde_json::json!({"attachment": "data"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_upload_too_large() {
    let mut config = Config::default();
    config.files.max_upload_size = 1024;
    let app = create_test_app_with(config).await;
    let (_, secret) = register_and_login(&app.server, "applicant").await;

    let mut content = png_bytes();
    content.resize(8 * 1024, 0);
    let response = app
        .server
        .post("/files")
        .add_header(AUTHORIZATION, bearer(&secret))
        .multipart(attachment(content, "scan.png", "image/png"))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["status"], 413);
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/files")
        .multipart(attachment(png_bytes(), "scan.png", "image/png"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
