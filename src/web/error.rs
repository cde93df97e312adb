//! API error handling.
//!
//! Every failure is rendered as `{status, message, details?}`. Causes of
//! server faults are logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{AuthError, LoginError, PermissionError, RegistrationError, TokenError};
use crate::CollegeError;

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON name of the offending field.
    pub field: String,
    /// Rule that failed, e.g. `required`, `gte`, `e164`.
    pub tag: String,
    /// Rule parameter, e.g. the minimum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Vec<FieldViolation>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&[FieldViolation]> {
        self.details.as_deref()
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn invalid_credentials() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Request entity is too large")
    }

    /// Body could not be parsed as the expected JSON document.
    pub fn malformed_json() -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request body contains malformed json",
        )
    }

    /// Multipart body missing the expected part or not an accepted image.
    pub fn malformed_form() -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request body contains malformed form data",
        )
    }

    pub fn unprocessable() -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request body contains unprocessable entity",
        )
    }

    /// Create an internal server error. The message is fixed.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    /// Create a validation error with rule-level details.
    pub fn invalid_request(mut details: Vec<FieldViolation>) -> Self {
        details.sort_by(|a, b| (&a.field, &a.tag).cmp(&(&b.field, &b.tag)));
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Request body is invalid".to_string(),
            details: Some(details),
        }
    }

    /// Create a validation error from validator::ValidationErrors.
    ///
    /// The rule code becomes the tag and a `param` entry, when present,
    /// becomes the parameter.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for e in field_errors.iter() {
                let param = e.params.get("param").map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
                details.push(FieldViolation {
                    field: field.to_string(),
                    tag: e.code.to_string(),
                    param,
                });
            }
        }

        Self::invalid_request(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            message: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<CollegeError> for ApiError {
    fn from(err: CollegeError) -> Self {
        match &err {
            CollegeError::NotFound(_) => ApiError::not_found(),
            CollegeError::Conflict(_) => ApiError::conflict("resource already exists"),
            CollegeError::InvalidReference(_) => {
                ApiError::bad_request("referenced entity does not exist")
            }
            CollegeError::Validation(msg) => ApiError::bad_request(msg.clone()),
            CollegeError::Permission(_) => ApiError::forbidden(),
            CollegeError::Auth(_) => ApiError::unauthorized(),
            _ => {
                tracing::error!(error = %err, "Internal error");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::InvalidCredential
            | AuthError::ExpiredCredential(_) => {
                tracing::debug!(reason = %err, "Rejected credential");
                ApiError::unauthorized()
            }
            AuthError::DataIntegrity { .. } => {
                tracing::error!(error = %err, "Authentication integrity fault");
                ApiError::internal()
            }
            AuthError::Storage(inner) => inner.into(),
        }
    }
}

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::Forbidden { .. } => {
                tracing::debug!(reason = %err, "Authorization denied");
                ApiError::forbidden()
            }
            PermissionError::InvalidTarget(_) => ApiError::bad_request("provided user ID is incorrect"),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::RandomSource(_) => {
                tracing::error!(error = %err, "Token issuance failed");
                ApiError::internal()
            }
            TokenError::Storage(inner) => inner.into(),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Taken => ApiError::conflict(err.to_string()),
            RegistrationError::UnknownReference(_) => {
                ApiError::bad_request("referenced entity does not exist")
            }
            RegistrationError::Password(_) => {
                tracing::error!(error = %err, "Registration failed");
                ApiError::internal()
            }
            RegistrationError::Database(inner) => inner.into(),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => ApiError::invalid_credentials(),
            LoginError::MissingCredential(_) | LoginError::CorruptHash => {
                tracing::error!(error = %err, "Login integrity fault");
                ApiError::internal()
            }
            LoginError::Storage(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_api_error_constructors() {
        assert_eq!(ApiError::bad_request("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized().message(), "Unauthorized");
        assert_eq!(ApiError::forbidden().message(), "Forbidden");
        assert_eq!(ApiError::not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("dup").status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::too_large().status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ApiError::malformed_json().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::internal().message(), "Internal Server Error");
    }

    #[test]
    fn test_credential_errors_are_uniform() {
        let errors = [
            AuthError::MissingCredential,
            AuthError::MalformedCredential,
            AuthError::InvalidCredential,
            AuthError::ExpiredCredential(Uuid::new_v4()),
        ];
        for err in errors {
            let api: ApiError = err.into();
            assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(api.message(), "Unauthorized");
        }
    }

    #[test]
    fn test_integrity_errors_hide_cause() {
        let api: ApiError = AuthError::DataIntegrity {
            token_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
        .into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "Internal Server Error");

        let api: ApiError = TokenError::RandomSource("getrandom failed".to_string()).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message().contains("getrandom"));

        let api: ApiError = CollegeError::Database("disk I/O error".to_string()).into();
        assert_eq!(api.message(), "Internal Server Error");
    }

    #[test]
    fn test_permission_errors() {
        let api: ApiError = PermissionError::Forbidden {
            required: crate::auth::Permissions::EDIT_USER,
            owner: Uuid::new_v4(),
        }
        .into();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);

        let api: ApiError = PermissionError::InvalidTarget("x".to_string()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_registration_taken() {
        let api: ApiError = RegistrationError::Taken.into();
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.message(), "this email or username is already taken");
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = validator::ValidationErrors::new();
        let mut min = validator::ValidationError::new("gte");
        min.add_param("param".into(), &"4");
        errors.add("username", min);
        errors.add("email", validator::ValidationError::new("email"));

        let api = ApiError::from_validation_errors(errors);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.message(), "Request body is invalid");
        assert_eq!(
            api.details().unwrap(),
            &[
                FieldViolation {
                    field: "email".to_string(),
                    tag: "email".to_string(),
                    param: None,
                },
                FieldViolation {
                    field: "username".to_string(),
                    tag: "gte".to_string(),
                    param: Some("4".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_body_shape() {
        let body = ErrorBody {
            status: 403,
            message: "Forbidden".to_string(),
            details: None,
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({"status": 403, "message": "Forbidden"}));
    }
}
