//! Middleware and request extractors for Web API.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{Credentials, CurrentUser};
pub use cors::create_cors_layer;
pub use security::security_headers;
