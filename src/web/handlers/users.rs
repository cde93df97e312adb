//! User handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::auth::{register as register_user, Permissions, RegistrationRequest};
use crate::db::{NewUserDetails, ProfileRepository};
use crate::web::dto::{PermissionsResponse, RegisterRequest, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::{load_target, AppState};
use crate::web::middleware::CurrentUser;

/// POST /users - Register a new applicant.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    // Checked by validation.
    let birthday = req.birthday.ok_or_else(ApiError::malformed_json)?;

    let request = RegistrationRequest {
        username: req.username,
        password: req.password,
        email: req.email,
        details: NewUserDetails {
            first_name: req.first_name,
            middle_name: req.middle_name,
            last_name: req.last_name,
            gender_id: req.gender_id,
            birthday,
            tel: req.tel,
            snils: None,
            needs_dorm: req.needs_dorm,
        },
    };

    let user = register_user(state.db.pool(), &request).await?;
    let details = ProfileRepository::new(state.db.pool())
        .get_details(user.id)
        .await?;

    Ok(Json(UserResponse::new(user, details)))
}

/// GET /users/:id - Get a user with their details.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;
    let details = ProfileRepository::new(state.db.pool())
        .get_details(user.id)
        .await?;

    Ok(Json(UserResponse::new(user, details)))
}

/// GET /users/:id/permissions - Get a user's permission mask.
pub async fn get_permissions(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PermissionsResponse>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;

    Ok(Json(PermissionsResponse::new(user.id, user.permissions)))
}
