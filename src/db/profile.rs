//! Applicant profile: personal details and postal address.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use super::DbPool;
use crate::Result;

/// Personal details captured at registration.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: Option<String>,
    pub gender_id: i64,
    pub birthday: NaiveDate,
    /// Phone number in E.164 form.
    pub tel: String,
    pub snils: Option<String>,
    pub needs_dorm: bool,
}

/// Data for creating a details record.
#[derive(Debug, Clone)]
pub struct NewUserDetails {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: Option<String>,
    pub gender_id: i64,
    pub birthday: NaiveDate,
    pub tel: String,
    pub snils: Option<String>,
    pub needs_dorm: bool,
}

/// Postal address, at most one per user.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAddress {
    pub user_id: Uuid,
    pub region_id: i64,
    pub town_type_id: i64,
    pub town: String,
    pub address: String,
    pub post_code: String,
}

/// Repository for details and address records.
pub struct ProfileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a details record inside an open transaction.
    pub async fn create_details_in(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
        details: &NewUserDetails,
    ) -> Result<UserDetails> {
        sqlx::query(
            "INSERT INTO user_details
                (user_id, first_name, middle_name, last_name, gender_id, birthday, tel, snils, needs_dorm)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user_id)
        .bind(&details.first_name)
        .bind(&details.middle_name)
        .bind(&details.last_name)
        .bind(details.gender_id)
        .bind(details.birthday)
        .bind(&details.tel)
        .bind(&details.snils)
        .bind(details.needs_dorm)
        .execute(&mut **tx)
        .await?;

        Ok(UserDetails {
            user_id,
            first_name: details.first_name.clone(),
            middle_name: details.middle_name.clone(),
            last_name: details.last_name.clone(),
            gender_id: details.gender_id,
            birthday: details.birthday,
            tel: details.tel.clone(),
            snils: details.snils.clone(),
            needs_dorm: details.needs_dorm,
        })
    }

    /// Get the details record of a user.
    pub async fn get_details(&self, user_id: Uuid) -> Result<Option<UserDetails>> {
        let details = sqlx::query_as::<_, UserDetails>(
            "SELECT user_id, first_name, middle_name, last_name, gender_id, birthday, tel, snils, needs_dorm
             FROM user_details WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(details)
    }

    /// Get the address of a user.
    pub async fn get_address(&self, user_id: Uuid) -> Result<Option<UserAddress>> {
        let address = sqlx::query_as::<_, UserAddress>(
            "SELECT user_id, region_id, town_type_id, town, address, post_code
             FROM user_addresses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    /// Create or replace the address of a user.
    pub async fn upsert_address(&self, address: &UserAddress) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_addresses (user_id, region_id, town_type_id, town, address, post_code)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT(user_id) DO UPDATE SET
                region_id = excluded.region_id,
                town_type_id = excluded.town_type_id,
                town = excluded.town,
                address = excluded.address,
                post_code = excluded.post_code",
        )
        .bind(address.user_id)
        .bind(address.region_id)
        .bind(address.town_type_id)
        .bind(&address.town)
        .bind(&address.address)
        .bind(&address.post_code)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
