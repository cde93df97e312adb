//! Application handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Permissions;
use crate::db::{
    Application, ApplicationRepository, DictStatusKind, DictionaryRepository, NewApplication,
};
use crate::web::dto::{ApplicationRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::{load_target, AppState};
use crate::web::middleware::CurrentUser;

/// GET /users/:id/applications - List applications by priority.
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Application>>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;
    let apps = ApplicationRepository::new(state.db.pool())
        .list_by_user(user.id)
        .await?;
    Ok(Json(apps))
}

/// POST /users/:id/applications - Apply to a major.
///
/// The application goes last in priority order with the default status.
pub async fn create_application(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ApplicationRequest>,
) -> Result<Json<Application>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::EDIT_USER).await?;
    let major_id = req.major_id.ok_or_else(ApiError::malformed_json)?;

    let pool = state.db.pool();
    let status = DictionaryRepository::new(pool)
        .default_status(DictStatusKind::Application)
        .await?;

    let app = ApplicationRepository::new(pool)
        .create(&NewApplication {
            user_id: user.id,
            major_id,
            edu_level_id: req.edu_level_id,
            status_id: status.id,
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        application_id = %app.id,
        priority = app.priority,
        "Application created"
    );
    Ok(Json(app))
}

/// DELETE /users/:id/applications/:app_id - Withdraw an application.
///
/// Later applications move up one place. Returns the deleted application.
pub async fn delete_application(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path((id, app_id)): Path<(String, String)>,
) -> Result<Json<Application>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::EDIT_USER).await?;
    let app_id = Uuid::parse_str(&app_id).map_err(|_| ApiError::unprocessable())?;

    let app = ApplicationRepository::new(state.db.pool())
        .delete(user.id, app_id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    tracing::info!(user_id = %user.id, application_id = %app.id, "Application withdrawn");
    Ok(Json(app))
}
