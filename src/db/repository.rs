//! User repository.
//!
//! CRUD operations for users and their password credentials.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use super::user::{NewUser, User};
use super::DbPool;
use crate::auth::Permissions;
use crate::Result;

const USER_COLUMNS: &str = "id, username, email, permissions, verified, created_at";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user together with its password hash.
    pub async fn create(&self, new_user: &NewUser, password_hash: &str) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let user = Self::create_in(&mut tx, new_user, password_hash).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Insert a user and its password inside an open transaction.
    pub async fn create_in(
        tx: &mut Transaction<'_, Sqlite>,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            permissions: new_user.permissions,
            verified: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, email, permissions, verified, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.permissions)
        .bind(user.verified)
        .bind(user.created_at)
        .execute(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO passwords (user_id, hash) VALUES ($1, $2)")
            .bind(user.id)
            .bind(password_hash)
            .execute(&mut **tx)
            .await?;

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get the stored password hash for a user.
    pub async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>> {
        let hash = sqlx::query_scalar("SELECT hash FROM passwords WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(hash)
    }

    /// Replace a user's permission mask.
    ///
    /// Returns false if the user does not exist.
    pub async fn set_permissions(&self, id: Uuid, permissions: Permissions) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET permissions = $1 WHERE id = $2")
            .bind(permissions)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Tokens, credentials and profile rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
