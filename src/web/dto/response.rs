//! Response DTOs for Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{IssuedToken, PermissionTable, Permissions};
use crate::db::{User, UserDetails, UserFile};

/// A user as seen by clients. Permissions travel as a decimal string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub permissions: String,
    pub details: Option<UserDetails>,
}

impl UserResponse {
    pub fn new(user: User, details: Option<UserDetails>) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            username: user.username,
            email: user.email,
            is_verified: user.verified,
            permissions: user.permissions.to_string(),
            details,
        }
    }
}

/// Permission mask of a user and its decoded flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsResponse {
    pub user_id: Uuid,
    pub permissions: String,
    #[serde(flatten)]
    pub table: PermissionTable,
}

impl PermissionsResponse {
    pub fn new(user_id: Uuid, permissions: Permissions) -> Self {
        Self {
            user_id,
            permissions: permissions.to_string(),
            table: permissions.table(),
        }
    }
}

/// A freshly issued token. The only place the raw secret ever appears.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            id: issued.token.id,
            user_id: issued.token.user_id,
            created_at: issued.token.created_at,
            expires_at: issued.token.expires_at,
            token: issued.secret,
        }
    }
}

/// Logout result.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Stored upload metadata. The disk path is not exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub sha256: String,
    pub user_id: Uuid,
    pub mime_type: String,
}

impl From<UserFile> for FileResponse {
    fn from(file: UserFile) -> Self {
        Self {
            id: file.id,
            created_at: file.created_at,
            sha256: file.sha256,
            user_id: file.user_id,
            mime_type: file.mime_type,
        }
    }
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
