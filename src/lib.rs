//! College admissions backend.
//!
//! Applicants register, log in with opaque bearer tokens and manage their
//! address, documents and applications over a REST API. Staff accounts act
//! on other applicants through a permission bitmask.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{has_permission, PermissionTable, Permissions};
pub use config::Config;
pub use db::{Database, User};
pub use error::{CollegeError, Result};
