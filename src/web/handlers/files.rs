//! File upload handler.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{NewUserFile, UserFileRepository};
use crate::file::ImageKind;
use crate::web::dto::FileResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::CurrentUser;

/// Multipart field holding the upload.
pub const ATTACHMENT_FIELD: &str = "attachment";

fn multipart_error(status: StatusCode) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::too_large()
    } else {
        ApiError::malformed_form()
    }
}

/// POST /files - Upload an image.
///
/// Request body: multipart/form-data with an `attachment` field. Only PNG
/// and JPEG content is accepted, whatever the declared type. The file is
/// owned by the user of the presenting token.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    CurrentUser { token, .. }: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(reason = %e.body_text(), "Rejected multipart body");
        multipart_error(e.status())
    })?;

    let mut content = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status()))?
    {
        if field.name() == Some(ATTACHMENT_FIELD) {
            let bytes = field.bytes().await.map_err(|e| multipart_error(e.status()))?;
            content = Some(bytes);
            break;
        }
    }

    let content = content.ok_or_else(ApiError::malformed_form)?;
    if content.len() > state.max_upload_size {
        return Err(ApiError::too_large());
    }
    let kind = ImageKind::sniff(&content).ok_or_else(ApiError::malformed_form)?;

    let stored = state.storage.save(token.user_id, &content, kind)?;

    let record = UserFileRepository::new(state.db.pool())
        .create(&NewUserFile {
            id: stored.id,
            sha256: stored.sha256.clone(),
            user_id: token.user_id,
            mime_type: kind.mime_type().to_string(),
            absolute_path: stored.path.to_string_lossy().into_owned(),
        })
        .await;

    let file = match record {
        Ok(file) => file,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&stored.path) {
                tracing::warn!(path = %stored.path.display(), error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %file.user_id,
        file_id = %file.id,
        size = content.len(),
        mime_type = %file.mime_type,
        "File uploaded"
    );

    Ok(Json(FileResponse::from(file)))
}
