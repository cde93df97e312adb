//! Identity and education document handlers.
//!
//! New documents start in the default document status.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::auth::Permissions;
use crate::db::{
    DictStatusKind, DictionaryRepository, DocumentRepository, EducationDoc, IdentityDoc,
    NewEducationDoc, NewIdentityDoc,
};
use crate::web::dto::{EducationDocRequest, IdentityDocRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::{load_target, AppState};
use crate::web::middleware::CurrentUser;

/// GET /users/:id/documents/identity
pub async fn list_identity_docs(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<IdentityDoc>>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;
    let docs = DocumentRepository::new(state.db.pool())
        .list_identity(user.id)
        .await?;
    Ok(Json(docs))
}

/// POST /users/:id/documents/identity
pub async fn create_identity_doc(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<IdentityDocRequest>,
) -> Result<Json<IdentityDoc>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::EDIT_USER).await?;
    let issued_at = req.issued_at.ok_or_else(ApiError::malformed_json)?;

    let pool = state.db.pool();
    let status = DictionaryRepository::new(pool)
        .default_status(DictStatusKind::Document)
        .await?;

    let doc = DocumentRepository::new(pool)
        .create_identity(&NewIdentityDoc {
            user_id: user.id,
            status_id: status.id,
            type_id: req.type_id,
            series: req.series,
            number: req.number,
            issuer: req.issuer,
            issued_at,
            division_code: req.division_code,
            nationality_id: req.nationality_id,
        })
        .await?;

    tracing::info!(user_id = %user.id, doc_id = %doc.id, "Identity document submitted");
    Ok(Json(doc))
}

/// GET /users/:id/documents/education
pub async fn list_education_docs(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<EducationDoc>>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::VIEW_USER).await?;
    let docs = DocumentRepository::new(state.db.pool())
        .list_education(user.id)
        .await?;
    Ok(Json(docs))
}

/// POST /users/:id/documents/education
pub async fn create_education_doc(
    State(state): State<Arc<AppState>>,
    CurrentUser { user: principal, .. }: CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<EducationDocRequest>,
) -> Result<Json<EducationDoc>, ApiError> {
    let user = load_target(&state, &principal, &id, Permissions::EDIT_USER).await?;
    let issued_at = req.issued_at.ok_or_else(ApiError::malformed_json)?;

    let pool = state.db.pool();
    let status = DictionaryRepository::new(pool)
        .default_status(DictStatusKind::Document)
        .await?;

    let doc = DocumentRepository::new(pool)
        .create_education(&NewEducationDoc {
            user_id: user.id,
            status_id: status.id,
            type_id: req.type_id,
            series: req.series,
            number: req.number,
            issuer: req.issuer,
            issued_at,
            grad_year: req.grad_year,
            issuer_region_id: req.issuer_region_id,
        })
        .await?;

    tracing::info!(user_id = %user.id, doc_id = %doc.id, "Education document submitted");
    Ok(Json(doc))
}
