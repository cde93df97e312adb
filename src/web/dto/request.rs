//! Request DTOs for Web API.
//!
//! Bodies reject unknown fields. Missing fields fall back to empty values so
//! that they surface as `required` violations rather than parse errors.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Applicant registration request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Phone number in E.164 form.
    pub tel: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender_id: i64,
    pub needs_dorm: bool,
}

/// Login request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query string of `POST /tokens`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    /// Also set the credential as a cookie.
    pub cookie: bool,
}

/// Address create-or-replace request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AddressRequest {
    pub region_id: i64,
    pub town_type_id: i64,
    pub town: String,
    pub address: String,
    pub post_code: String,
}

/// Identity document submission.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct IdentityDocRequest {
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: Option<NaiveDate>,
    pub division_code: String,
    pub nationality_id: i64,
}

/// Education document submission.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EducationDocRequest {
    pub type_id: i64,
    pub series: String,
    pub number: String,
    pub issuer: String,
    pub issued_at: Option<NaiveDate>,
    pub grad_year: i64,
    pub issuer_region_id: i64,
}

/// New application to a major.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ApplicationRequest {
    pub major_id: Option<Uuid>,
    pub edu_level_id: i64,
}
