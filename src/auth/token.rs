//! Opaque bearer token issuance and lookup.
//!
//! A secret is `size` bytes from the OS random source, base64 encoded with
//! the standard alphabet. Only its SHA-256 digest is persisted, so the raw
//! secret exists solely in the issuance response.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::{AuthConfig, MIN_TOKEN_SIZE};
use crate::db::{AuthToken, AuthTokenRepository, DbPool, NewAuthToken};
use crate::CollegeError;

/// Token store errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The entropy source failed. There is no fallback.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] CollegeError),
}

/// A freshly issued token together with its raw secret.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: AuthToken,
    /// Base64 secret. Not recoverable once this value is dropped.
    pub secret: String,
}

/// Generate a base64 secret of at least [`MIN_TOKEN_SIZE`] random bytes.
pub fn generate_secret<R: RngCore + ?Sized>(rng: &mut R, size: usize) -> Result<String, TokenError> {
    let mut bytes = vec![0u8; size.max(MIN_TOKEN_SIZE)];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::RandomSource(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

/// Hex SHA-256 digest of a secret, as stored in the database.
pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// Issues, finds and revokes tokens.
pub struct TokenStore<'a> {
    pool: &'a DbPool,
    size: usize,
    lifetime: Duration,
}

impl<'a> TokenStore<'a> {
    /// Create a store using the configured secret size and lifetime.
    pub fn new(pool: &'a DbPool, config: &AuthConfig) -> Self {
        Self {
            pool,
            size: config.token_size,
            lifetime: config.token_lifetime(),
        }
    }

    /// Issue a token for `user_id` from the OS random source.
    pub async fn issue(&self, user_id: Uuid) -> Result<IssuedToken, TokenError> {
        self.issue_with(&mut OsRng, user_id, Utc::now()).await
    }

    /// Issue a token with an explicit random source and creation time.
    pub async fn issue_with<R: RngCore + Send>(
        &self,
        rng: &mut R,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let secret = generate_secret(rng, self.size).inspect_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to generate token secret");
        })?;

        let token = AuthTokenRepository::new(self.pool)
            .create(&NewAuthToken {
                user_id,
                token_hash: hash_secret(&secret),
                created_at: now,
                expires_at: now + self.lifetime,
            })
            .await?;

        debug!(user_id = %user_id, token_id = %token.id, "Issued auth token");
        Ok(IssuedToken { token, secret })
    }

    /// Find a token by its raw secret.
    pub async fn find_by_secret(&self, secret: &str) -> Result<Option<AuthToken>, TokenError> {
        let token = AuthTokenRepository::new(self.pool)
            .get_by_hash(&hash_secret(secret))
            .await?;
        Ok(token)
    }

    /// Delete a token. Revoking an already deleted token succeeds.
    pub async fn revoke(&self, token: &AuthToken) -> Result<bool, TokenError> {
        let deleted = AuthTokenRepository::new(self.pool).delete(token.id).await?;
        if deleted {
            debug!(user_id = %token.user_id, token_id = %token.id, "Revoked auth token");
        }
        Ok(deleted)
    }
}
