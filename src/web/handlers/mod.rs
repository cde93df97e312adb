//! API handlers.

pub mod applications;
pub mod dictionaries;
pub mod documents;
pub mod files;
pub mod profile;
pub mod tokens;
pub mod users;

pub use applications::*;
pub use dictionaries::*;
pub use documents::*;
pub use files::*;
pub use profile::*;
pub use tokens::*;
pub use users::*;

use crate::auth::{authorize_path, Permissions};
use crate::config::{AuthConfig, Config};
use crate::db::{User, UserRepository};
use crate::file::FileStorage;
use crate::web::error::ApiError;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Token size and lifetime.
    pub auth: AuthConfig,
    pub storage: FileStorage,
    /// Upload limit in bytes.
    pub max_upload_size: usize,
    /// Marks auth cookies `Secure`.
    pub production: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, storage: FileStorage, config: &Config) -> Self {
        Self {
            db,
            auth: config.auth.clone(),
            storage,
            max_upload_size: config.files.max_upload_size,
            production: config.server.production,
        }
    }
}

/// Resolve `{id}`, run the permission gate and load the target user.
///
/// The principal is returned as is when it targets itself. A target that
/// passes the gate but does not exist is a 404.
pub(crate) async fn load_target(
    state: &AppState,
    principal: &User,
    raw_id: &str,
    required: Permissions,
) -> Result<User, ApiError> {
    let target = authorize_path(principal, raw_id, required)?;
    if target == principal.id {
        return Ok(principal.clone());
    }

    UserRepository::new(state.db.pool())
        .get_by_id(target)
        .await?
        .ok_or_else(ApiError::not_found)
}
