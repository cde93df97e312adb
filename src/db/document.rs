//! Identity and education documents submitted by applicants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::DbPool;
use crate::Result;

/// Identity document (passport and the like).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDoc {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub status_id: Option<i64>,
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: NaiveDate,
    pub division_code: String,
    pub nationality_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewIdentityDoc {
    pub user_id: Uuid,
    pub status_id: i64,
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: NaiveDate,
    pub division_code: String,
    pub nationality_id: i64,
}

/// Education document (school certificate, diploma).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EducationDoc {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub status_id: Option<i64>,
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: NaiveDate,
    pub grad_year: i64,
    pub issuer_region_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewEducationDoc {
    pub user_id: Uuid,
    pub status_id: i64,
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: NaiveDate,
    pub grad_year: i64,
    pub issuer_region_id: i64,
}

/// Repository for both document kinds.
pub struct DocumentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new identity document.
    pub async fn create_identity(&self, doc: &NewIdentityDoc) -> Result<IdentityDoc> {
        let created = IdentityDoc {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id: doc.user_id,
            status_id: Some(doc.status_id),
            type_id: doc.type_id,
            series: doc.series.clone(),
            number: doc.number.clone(),
            issuer: doc.issuer.clone(),
            issued_at: doc.issued_at,
            division_code: doc.division_code.clone(),
            nationality_id: doc.nationality_id,
        };

        sqlx::query(
            "INSERT INTO identity_docs
                (id, created_at, user_id, status_id, type_id, series, number, issuer,
                 issued_at, division_code, nationality_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(created.id)
        .bind(created.created_at)
        .bind(created.user_id)
        .bind(created.status_id)
        .bind(created.type_id)
        .bind(&created.series)
        .bind(&created.number)
        .bind(&created.issuer)
        .bind(created.issued_at)
        .bind(&created.division_code)
        .bind(created.nationality_id)
        .execute(self.pool)
        .await?;

        Ok(created)
    }

    /// List identity documents of a user, oldest first.
    pub async fn list_identity(&self, user_id: Uuid) -> Result<Vec<IdentityDoc>> {
        let docs = sqlx::query_as::<_, IdentityDoc>(
            "SELECT id, created_at, user_id, status_id, type_id, series, number, issuer,
                    issued_at, division_code, nationality_id
             FROM identity_docs WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(docs)
    }

    /// Store a new education document.
    pub async fn create_education(&self, doc: &NewEducationDoc) -> Result<EducationDoc> {
        let created = EducationDoc {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id: doc.user_id,
            status_id: Some(doc.status_id),
            type_id: doc.type_id,
            series: doc.series.clone(),
            number: doc.number.clone(),
            issuer: doc.issuer.clone(),
            issued_at: doc.issued_at,
            grad_year: doc.grad_year,
            issuer_region_id: doc.issuer_region_id,
        };

        sqlx::query(
            "INSERT INTO education_docs
                (id, created_at, user_id, status_id, type_id, series, number, issuer,
                 issued_at, grad_year, issuer_region_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(created.id)
        .bind(created.created_at)
        .bind(created.user_id)
        .bind(created.status_id)
        .bind(created.type_id)
        .bind(&created.series)
        .bind(&created.number)
        .bind(&created.issuer)
        .bind(created.issued_at)
        .bind(created.grad_year)
        .bind(created.issuer_region_id)
        .execute(self.pool)
        .await?;

        Ok(created)
    }

    /// List education documents of a user, oldest first.
    pub async fn list_education(&self, user_id: Uuid) -> Result<Vec<EducationDoc>> {
        let docs = sqlx::query_as::<_, EducationDoc>(
            "SELECT id, created_at, user_id, status_id, type_id, series, number, issuer,
                    issued_at, grad_year, issuer_region_id
             FROM education_docs WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository};
    use crate::CollegeError;

    async fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("applicant", "a@example.com"), "hash")
            .await
            .unwrap();
        (db, user.id)
    }

    fn passport(user_id: Uuid) -> NewIdentityDoc {
        NewIdentityDoc {
            user_id,
            status_id: 1,
            type_id: 1,
            series: "4510".to_string(),
            number: "123456".to_string(),
            issuer: "MVD".to_string(),
            issued_at: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            division_code: "770-001".to_string(),
            nationality_id: 1,
        }
    }

    #[tokio::test]
    async fn test_identity_docs() {
        let (db, user_id) = setup().await;
        let repo = DocumentRepository::new(db.pool());

        let created = repo.create_identity(&passport(user_id)).await.unwrap();
        let listed = repo.list_identity(user_id).await.unwrap();

        assert_eq!(listed, vec![created]);
        assert!(repo.list_identity(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_identity_doc_unknown_type() {
        let (db, user_id) = setup().await;
        let repo = DocumentRepository::new(db.pool());

        let mut doc = passport(user_id);
        doc.type_id = 999;
        let result = repo.create_identity(&doc).await;
        assert!(matches!(result, Err(CollegeError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn test_education_docs() {
        let (db, user_id) = setup().await;
        let repo = DocumentRepository::new(db.pool());

        let created = repo
            .create_education(&NewEducationDoc {
                user_id,
                status_id: 1,
                type_id: 2,
                series: "AB".to_string(),
                number: "000123".to_string(),
                issuer: "School 1".to_string(),
                issued_at: NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
                grad_year: 2024,
                issuer_region_id: 1,
            })
            .await
            .unwrap();

        let listed = repo.list_education(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].grad_year, 2024);
    }
}
