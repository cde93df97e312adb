//! Resolve a request's bearer credential to the authenticated principal.
//!
//! Resolution order, first match wins:
//!
//! 1. a non-empty `token` cookie
//! 2. otherwise a non-empty `Authorization` header
//! 3. neither present: [`AuthError::MissingCredential`]
//! 4. no literal `Bearer ` prefix: [`AuthError::MalformedCredential`]
//! 5. unknown secret: [`AuthError::InvalidCredential`]
//! 6. expired: the token is deleted, [`AuthError::ExpiredCredential`]
//! 7. owner missing: [`AuthError::DataIntegrity`]
//!
//! Only one transport is consulted per request.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use super::token::{TokenError, TokenStore};
use crate::config::AuthConfig;
use crate::db::{AuthToken, DbPool, User, UserRepository};
use crate::CollegeError;

/// Credential prefix required on both transports.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Name of the cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no credential attached to the request")]
    MissingCredential,

    #[error("credential is not a bearer token")]
    MalformedCredential,

    #[error("unknown token")]
    InvalidCredential,

    #[error("token {0} has expired")]
    ExpiredCredential(Uuid),

    /// A token references a user that no longer exists.
    #[error("token {token_id} references missing user {user_id}")]
    DataIntegrity { token_id: Uuid, user_id: Uuid },

    #[error(transparent)]
    Storage(#[from] CollegeError),
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Storage(inner) => AuthError::Storage(inner),
            other => AuthError::Storage(CollegeError::Auth(other.to_string())),
        }
    }
}

/// Pick the credential from the cookie or header value and strip its prefix.
///
/// An empty value counts as absent. The cookie wins when both are present,
/// even if only the header is well formed.
pub fn extract_credential<'r>(
    cookie: Option<&'r str>,
    header: Option<&'r str>,
) -> Result<&'r str, AuthError> {
    let candidate = cookie
        .filter(|v| !v.is_empty())
        .or_else(|| header.filter(|v| !v.is_empty()))
        .ok_or(AuthError::MissingCredential)?;

    candidate
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedCredential)
}

/// Turns a raw secret into `(User, AuthToken)`.
pub struct Resolver<'a> {
    pool: &'a DbPool,
    tokens: TokenStore<'a>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given pool.
    pub fn new(pool: &'a DbPool, config: &AuthConfig) -> Self {
        Self {
            pool,
            tokens: TokenStore::new(pool, config),
        }
    }

    /// Resolve transports against the current time.
    pub async fn resolve(
        &self,
        cookie: Option<&str>,
        header: Option<&str>,
    ) -> Result<(User, AuthToken), AuthError> {
        self.resolve_at(cookie, header, Utc::now()).await
    }

    /// Resolve transports against an explicit `now`.
    pub async fn resolve_at(
        &self,
        cookie: Option<&str>,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(User, AuthToken), AuthError> {
        let secret = extract_credential(cookie, header)?;
        self.resolve_secret_at(secret, now).await
    }

    /// Resolve an already extracted secret.
    pub async fn resolve_secret_at(
        &self,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, AuthToken), AuthError> {
        let token = self
            .tokens
            .find_by_secret(secret)
            .await?
            .ok_or(AuthError::InvalidCredential)?;

        if token.is_expired_at(now) {
            self.tokens.revoke(&token).await?;
            debug!(token_id = %token.id, user_id = %token.user_id, "Reaped expired token");
            return Err(AuthError::ExpiredCredential(token.id));
        }

        let Some(user) = UserRepository::new(self.pool).get_by_id(token.user_id).await? else {
            error!(
                token_id = %token.id,
                user_id = %token.user_id,
                "Token references a missing user"
            );
            return Err(AuthError::DataIntegrity {
                token_id: token.id,
                user_id: token.user_id,
            });
        };

        Ok((user, token))
    }
}
