//! Auth token repository.
//!
//! Only the SHA-256 digest of a token secret is stored. Callers hash the
//! presented secret before looking it up.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::Result;

/// Bearer token entity.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AuthToken {
    /// Token ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Hex SHA-256 digest of the secret.
    pub token_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// A token is expired from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// New auth token for creation.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Hex SHA-256 digest of the secret.
    pub token_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Repository for auth token operations.
pub struct AuthTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AuthTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new token.
    pub async fn create(&self, new_token: &NewAuthToken) -> Result<AuthToken> {
        let token = AuthToken {
            id: Uuid::new_v4(),
            user_id: new_token.user_id,
            token_hash: new_token.token_hash.clone(),
            created_at: new_token.created_at,
            expires_at: new_token.expires_at,
        };

        sqlx::query(
            "INSERT INTO auth_tokens (id, user_id, token_hash, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(self.pool)
        .await?;

        Ok(token)
    }

    /// Get a token by its digest.
    pub async fn get_by_hash(&self, token_hash: &str) -> Result<Option<AuthToken>> {
        let token = sqlx::query_as::<_, AuthToken>(
            "SELECT id, user_id, token_hash, created_at, expires_at
             FROM auth_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// List all tokens of a user, oldest first.
    #[cfg(test)]
    pub(crate) async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AuthToken>> {
        let tokens = sqlx::query_as::<_, AuthToken>(
            "SELECT id, user_id, token_hash, created_at, expires_at
             FROM auth_tokens WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tokens)
    }

    /// Delete a token by ID. Deleting a missing token is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
