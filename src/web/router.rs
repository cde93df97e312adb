//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::dto::HealthResponse;
use super::handlers::{
    create_application, create_education_doc, create_identity_doc, delete_application,
    get_address, get_dictionary, get_permissions, get_user, list_applications,
    list_education_docs, list_identity_docs, list_majors, login, logout, put_address, register,
    upload_file, AppState,
};
use super::middleware::{create_cors_layer, security_headers};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // No credential required
    let public_routes = Router::new()
        .route("/users", post(register))
        .route("/tokens", post(login).delete(logout))
        .route("/dictionaries/:name", get(get_dictionary))
        .route("/majors", get(list_majors));

    // `:id` accepts a UUID or `@me`
    let user_routes = Router::new()
        .route("/users/:id", get(get_user))
        .route("/users/:id/permissions", get(get_permissions))
        .route("/users/:id/address", get(get_address).put(put_address))
        .route(
            "/users/:id/documents/identity",
            get(list_identity_docs).post(create_identity_doc),
        )
        .route(
            "/users/:id/documents/education",
            get(list_education_docs).post(create_education_doc),
        )
        .route(
            "/users/:id/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/users/:id/applications/:app_id",
            axum::routing::delete(delete_application),
        );

    let file_routes = Router::new()
        .route("/files", post(upload_file))
        .layer(DefaultBodyLimit::max(app_state.max_upload_size));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(file_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
