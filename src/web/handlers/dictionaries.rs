//! Dictionary handlers.
//!
//! Dictionaries change only with migrations, so clients may cache them for
//! a day and serve stale copies while revalidating.

use axum::{
    extract::{Path, State},
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{DictStatusKind, Dictionary, DictionaryRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// `Cache-Control` of dictionary responses.
pub const DICTIONARY_CACHE_CONTROL: &str = "max-age=86400, stale-while-revalidate=21600";

fn cached<T: Serialize>(data: T) -> Response {
    ([(CACHE_CONTROL, DICTIONARY_CACHE_CONTROL)], Json(data)).into_response()
}

/// GET /dictionaries/:name
pub async fn get_dictionary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let repo = DictionaryRepository::new(state.db.pool());

    let response = match name.as_str() {
        "regions" => cached(repo.regions().await?),
        "nationalities" => cached(repo.nationalities().await?),
        "appstatuses" => cached(repo.statuses(DictStatusKind::Application).await?),
        "docstatuses" => cached(repo.statuses(DictStatusKind::Document).await?),
        other => {
            let dict = match other {
                "towntypes" => Dictionary::TownTypes,
                "genders" => Dictionary::Genders,
                "edulevels" => Dictionary::EduLevels,
                "iddoctypes" => Dictionary::IdDocTypes,
                "edudoctypes" => Dictionary::EduDocTypes,
                _ => return Err(ApiError::not_found()),
            };
            cached(repo.entries(dict).await?)
        }
    };

    Ok(response)
}

/// GET /majors
pub async fn list_majors(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let majors = DictionaryRepository::new(state.db.pool()).majors().await?;
    Ok(cached(majors))
}
