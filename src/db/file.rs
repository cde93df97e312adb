//! Uploaded file records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::Result;

/// Metadata of a stored upload.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserFile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the content.
    pub sha256: String,
    pub user_id: Uuid,
    pub mime_type: String,
    /// Location on disk. Never sent to clients.
    pub absolute_path: String,
}

#[derive(Debug, Clone)]
pub struct NewUserFile {
    pub id: Uuid,
    pub sha256: String,
    pub user_id: Uuid,
    pub mime_type: String,
    pub absolute_path: String,
}

/// Repository for upload records.
pub struct UserFileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserFileRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Record a stored upload.
    pub async fn create(&self, file: &NewUserFile) -> Result<UserFile> {
        let created = UserFile {
            id: file.id,
            created_at: Utc::now(),
            sha256: file.sha256.clone(),
            user_id: file.user_id,
            mime_type: file.mime_type.clone(),
            absolute_path: file.absolute_path.clone(),
        };

        sqlx::query(
            "INSERT INTO user_files (id, created_at, sha256, user_id, mime_type, absolute_path)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(created.id)
        .bind(created.created_at)
        .bind(&created.sha256)
        .bind(created.user_id)
        .bind(&created.mime_type)
        .bind(&created.absolute_path)
        .execute(self.pool)
        .await?;

        Ok(created)
    }

    /// Get an upload record by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<UserFile>> {
        let file = sqlx::query_as::<_, UserFile>(
            "SELECT id, created_at, sha256, user_id, mime_type, absolute_path
             FROM user_files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List a user's uploads, oldest first.
    #[cfg(test)]
    pub(crate) async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<UserFile>> {
        let files = sqlx::query_as::<_, UserFile>(
            "SELECT id, created_at, sha256, user_id, mime_type, absolute_path
             FROM user_files WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }
}
