//! Reference dictionaries and college majors.
//!
//! Dictionaries are seeded by migrations and read-only at runtime.

use serde::Serialize;
use uuid::Uuid;

use super::DbPool;
use crate::{CollegeError, Result};

/// Plain `{id, value, displayValue}` dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dictionary {
    TownTypes,
    Genders,
    EduLevels,
    IdDocTypes,
    EduDocTypes,
}

impl Dictionary {
    fn table(self) -> &'static str {
        match self {
            Dictionary::TownTypes => "dict_town_types",
            Dictionary::Genders => "dict_genders",
            Dictionary::EduLevels => "dict_edu_levels",
            Dictionary::IdDocTypes => "dict_id_doc_types",
            Dictionary::EduDocTypes => "dict_edu_doc_types",
        }
    }
}

/// Status dictionaries carrying an `isDefault` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictStatusKind {
    Application,
    Document,
}

impl DictStatusKind {
    fn table(self) -> &'static str {
        match self {
            DictStatusKind::Application => "dict_app_statuses",
            DictStatusKind::Document => "dict_doc_statuses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DictEntry {
    pub id: i64,
    pub value: String,
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DictStatus {
    pub id: i64,
    pub is_default: bool,
    pub value: String,
    pub display_value: Option<String>,
}

/// Dictionary entry with an explicit ordering weight (nationalities).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RankedDictEntry {
    pub id: i64,
    pub value: String,
    pub display_value: Option<String>,
    pub sort_priority: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DictRegion {
    pub id: i64,
    /// Official region number.
    pub region_id: i64,
    pub value: String,
    pub display_value: Option<String>,
    pub sort_priority: i64,
}

/// A major applicants can apply to.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CollegeMajor {
    pub id: Uuid,
    pub name: String,
    pub prefix: String,
    pub base: String,
    pub name_official: String,
    pub budget: bool,
    pub code: String,
}

/// Repository for dictionary reads.
pub struct DictionaryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> DictionaryRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List a plain dictionary ordered by id.
    pub async fn entries(&self, dict: Dictionary) -> Result<Vec<DictEntry>> {
        let sql = format!(
            "SELECT id, value, display_value FROM {} ORDER BY id",
            dict.table()
        );
        let rows = sqlx::query_as::<_, DictEntry>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// List a status dictionary ordered by id.
    pub async fn statuses(&self, kind: DictStatusKind) -> Result<Vec<DictStatus>> {
        let sql = format!(
            "SELECT id, is_default, value, display_value FROM {} ORDER BY id",
            kind.table()
        );
        let rows = sqlx::query_as::<_, DictStatus>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// The status new records start with.
    pub async fn default_status(&self, kind: DictStatusKind) -> Result<DictStatus> {
        let sql = format!(
            "SELECT id, is_default, value, display_value FROM {} WHERE is_default = 1 ORDER BY id LIMIT 1",
            kind.table()
        );
        sqlx::query_as::<_, DictStatus>(&sql)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| CollegeError::NotFound(format!("default status in {}", kind.table())))
    }

    /// List nationalities, highest priority first.
    pub async fn nationalities(&self) -> Result<Vec<RankedDictEntry>> {
        let rows = sqlx::query_as::<_, RankedDictEntry>(
            "SELECT id, value, display_value, sort_priority
             FROM dict_nationalities ORDER BY sort_priority DESC, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List regions, highest priority first.
    pub async fn regions(&self) -> Result<Vec<DictRegion>> {
        let rows = sqlx::query_as::<_, DictRegion>(
            "SELECT id, region_id, value, display_value, sort_priority
             FROM dict_regions ORDER BY sort_priority DESC, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List all majors.
    pub async fn majors(&self) -> Result<Vec<CollegeMajor>> {
        let rows = sqlx::query_as::<_, CollegeMajor>(
            "SELECT id, name, prefix, base, name_official, budget, code
             FROM college_majors ORDER BY code, base",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
