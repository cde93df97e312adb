//! Applicant registration.
//!
//! The user row, its password and its details record are written in one
//! transaction. Input is expected to be validated already.

use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, PasswordError};
use crate::db::{DbPool, NewUser, NewUserDetails, ProfileRepository, User, UserRepository};
use crate::CollegeError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Username or email already taken.
    #[error("this email or username is already taken")]
    Taken,

    /// A dictionary id (gender) does not exist.
    #[error("unknown reference: {0}")]
    UnknownReference(String),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(CollegeError),
}

impl From<CollegeError> for RegistrationError {
    fn from(e: CollegeError) -> Self {
        match e {
            CollegeError::Conflict(_) => RegistrationError::Taken,
            CollegeError::InvalidReference(msg) => RegistrationError::UnknownReference(msg),
            other => RegistrationError::Database(other),
        }
    }
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub details: NewUserDetails,
}

/// Register a new applicant.
///
/// Returns the created user. Nothing is written if any step fails.
pub async fn register(
    pool: &DbPool,
    request: &RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser::new(&request.username, &request.email);

    let mut tx = pool.begin().await.map_err(CollegeError::from)?;
    let user = UserRepository::create_in(&mut tx, &new_user, &password_hash).await?;
    ProfileRepository::create_details_in(&mut tx, user.id, &request.details).await?;
    tx.commit().await.map_err(CollegeError::from)?;

    info!(username = %user.username, user_id = %user.id, "New user registered");

    Ok(user)
}
