//! Address handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::auth::Permissions;
use crate::db::{ProfileRepository, UserAddress};
use crate::web::dto::{AddressRequest, SuccessResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::{load_target, AppState};
use crate::web::middleware::CurrentUser;

/// GET /users/:id/address - Get a user's address.
pub async fn get_address(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserAddress>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;

    let address = ProfileRepository::new(state.db.pool())
        .get_address(user.id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(address))
}

/// PUT /users/:id/address - Create or replace a user's address.
pub async fn put_address(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddressRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::EDIT_USER).await?;

    ProfileRepository::new(state.db.pool())
        .upsert_address(&UserAddress {
            user_id: user.id,
            region_id: req.region_id,
            town_type_id: req.town_type_id,
            town: req.town,
            address: req.address,
            post_code: req.post_code,
        })
        .await?;

    tracing::debug!(user_id = %user.id, actor = %principal.id, "Address saved");

    Ok(Json(SuccessResponse::ok()))
}
