//! Applications to college majors.
//!
//! Priorities are dense and 1-based per user: a new application goes to the
//! end, and deleting one shifts every later application up by one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::DbPool;
use crate::Result;

/// An application to a major.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub major_id: Uuid,
    pub edu_level_id: i64,
    pub status_id: i64,
    pub priority: i64,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub major_id: Uuid,
    pub edu_level_id: i64,
    pub status_id: i64,
}

/// Repository for applications.
pub struct ApplicationRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ApplicationRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append an application after the user's lowest-priority one.
    ///
    /// The priority is computed inside the INSERT, so concurrent creates for
    /// the same user never read a stale maximum.
    pub async fn create(&self, app: &NewApplication) -> Result<Application> {
        let created = sqlx::query_as::<_, Application>(
            "INSERT INTO applications (id, created_at, user_id, major_id, edu_level_id, status_id, priority)
             SELECT $1, $2, $3, $4, $5, $6, COALESCE(MAX(priority), 0) + 1
             FROM applications WHERE user_id = $3
             RETURNING id, created_at, user_id, major_id, edu_level_id, status_id, priority",
        )
        .bind(Uuid::new_v4())
        .bind(Utc::now())
        .bind(app.user_id)
        .bind(app.major_id)
        .bind(app.edu_level_id)
        .bind(app.status_id)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List a user's applications by priority.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let apps = sqlx::query_as::<_, Application>(
            "SELECT id, created_at, user_id, major_id, edu_level_id, status_id, priority
             FROM applications WHERE user_id = $1 ORDER BY priority",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(apps)
    }

    /// Delete one of a user's applications and close the priority gap.
    ///
    /// Returns the deleted application, or None if the user has no
    /// application with that id.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Application>> {
        let mut tx = self.pool.begin().await?;

        // Deleting first takes the write lock before anything is read
        let target = sqlx::query_as::<_, Application>(
            "DELETE FROM applications WHERE user_id = $1 AND id = $2
             RETURNING id, created_at, user_id, major_id, edu_level_id, status_id, priority",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(target) = target else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE applications SET priority = priority - 1 WHERE user_id = $1 AND priority > $2",
        )
        .bind(user_id)
        .bind(target.priority)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(target))
    }
}
