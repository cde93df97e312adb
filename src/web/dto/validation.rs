//! Validation rules for request DTOs.
//!
//! Each field reports at most one violation, the first rule it fails, in the
//! order the rules are listed. Lengths count characters, not bytes.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use super::request::{
    AddressRequest, ApplicationRequest, EducationDocRequest, IdentityDocRequest, LoginRequest,
    RegisterRequest,
};
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Unparseable bodies are rejected with 422, oversized ones with 413 and
/// rule violations with 400 plus per-field details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "Rejected JSON body");
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::too_large()
                } else {
                    ApiError::malformed_json()
                }
            })?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Rule checks
// ============================================================================

/// Collects violations for one request body.
struct Rules {
    errors: ValidationErrors,
}

impl Rules {
    fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    fn fail(&mut self, field: &'static str, tag: &'static str, param: Option<usize>) {
        let mut error = ValidationError::new(tag);
        if let Some(param) = param {
            error.add_param("param".into(), &param.to_string());
        }
        self.errors.add(field, error);
    }

    /// A non-zero id.
    fn id(&mut self, field: &'static str, value: i64) {
        if value == 0 {
            self.fail(field, "required", None);
        }
    }

    fn present<T>(&mut self, field: &'static str, value: &Option<T>) {
        if value.is_none() {
            self.fail(field, "required", None);
        }
    }

    /// Non-empty text within `min..=max` characters. Returns whether it passed.
    fn text(&mut self, field: &'static str, value: &str, min: usize, max: Option<usize>) -> bool {
        let len = value.chars().count();
        if len == 0 {
            self.fail(field, "required", None);
        } else if len < min {
            self.fail(field, "gte", Some(min));
        } else if let Some(max) = max.filter(|max| len > *max) {
            self.fail(field, "lte", Some(max));
        } else {
            return true;
        }
        false
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Letters, digits and underscores only.
pub fn is_valid_username(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `+` followed by up to 15 digits, the first of which is not zero.
pub fn is_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();

        if rules.text("username", &self.username, 4, Some(20)) && !is_valid_username(&self.username)
        {
            rules.fail("username", "username", None);
        }
        rules.text("password", &self.password, 6, Some(72));
        if rules.text("email", &self.email, 1, None) && !self.email.validate_email() {
            rules.fail("email", "email", None);
        }
        if rules.text("tel", &self.tel, 1, None) && !is_e164(&self.tel) {
            rules.fail("tel", "e164", None);
        }
        rules.text("firstName", &self.first_name, 2, None);
        rules.text("middleName", &self.middle_name, 2, None);
        if let Some(last_name) = &self.last_name {
            if last_name.chars().count() < 2 {
                rules.fail("lastName", "gte", Some(2));
            }
        }
        rules.present("birthday", &self.birthday);
        rules.id("genderId", self.gender_id);

        rules.finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.text("username", &self.username, 1, None);
        rules.text("password", &self.password, 6, Some(72));
        rules.finish()
    }
}

impl Validate for AddressRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.id("regionId", self.region_id);
        rules.id("townTypeId", self.town_type_id);
        rules.text("town", &self.town, 1, None);
        rules.text("address", &self.address, 1, None);
        rules.text("postCode", &self.post_code, 1, None);
        rules.finish()
    }
}

impl Validate for IdentityDocRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.id("typeId", self.type_id);
        rules.text("series", &self.series, 2, None);
        rules.text("number", &self.number, 2, None);
        rules.text("issuer", &self.issuer, 2, None);
        rules.present("issuedAt", &self.issued_at);
        rules.text("divisionCode", &self.division_code, 2, None);
        rules.id("nationalityId", self.nationality_id);
        rules.finish()
    }
}

impl Validate for EducationDocRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.id("typeId", self.type_id);
        rules.text("series", &self.series, 1, None);
        rules.text("number", &self.number, 1, None);
        rules.text("issuer", &self.issuer, 1, None);
        rules.present("issuedAt", &self.issued_at);
        rules.id("gradYear", self.grad_year);
        rules.id("issuerRegionId", self.issuer_region_id);
        rules.finish()
    }
}

impl Validate for ApplicationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.present("majorId", &self.major_id);
        rules.id("eduLevelId", self.edu_level_id);
        rules.finish()
    }
}
