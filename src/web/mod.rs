//! HTTP API for the admissions backend.
//!
//! Routes, request extraction, validation and error rendering live here.
//! Authentication and authorization decisions are made in [`crate::auth`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
