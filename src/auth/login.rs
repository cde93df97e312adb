//! Username/password login.

use thiserror::Error;
use tracing::debug;

use crate::auth::{verify_dummy, verify_password, PasswordError};
use crate::db::{DbPool, User, UserRepository};
use crate::CollegeError;

#[derive(Error, Debug)]
pub enum LoginError {
    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user exists without a password row.
    #[error("user {0} has no credential")]
    MissingCredential(uuid::Uuid),

    #[error("stored password hash is invalid")]
    CorruptHash,

    #[error(transparent)]
    Storage(#[from] CollegeError),
}

/// Check a username/password pair and return the matching user.
pub async fn login(pool: &DbPool, username: &str, password: &str) -> Result<User, LoginError> {
    let repo = UserRepository::new(pool);

    let Some(user) = repo.get_by_username(username).await? else {
        debug!(username = %username, "Login attempt for unknown user");
        verify_dummy(password);
        return Err(LoginError::InvalidCredentials);
    };

    let hash = repo
        .get_password_hash(user.id)
        .await?
        .ok_or(LoginError::MissingCredential(user.id))?;

    match verify_password(password, &hash) {
        Ok(()) => Ok(user),
        Err(PasswordError::VerificationFailed) => {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            Err(LoginError::InvalidCredentials)
        }
        Err(_) => Err(LoginError::CorruptHash),
    }
}
