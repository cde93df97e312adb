//! Token handlers: login and logout.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::{
    extract_credential, login as check_credentials, AuthError, TokenStore, BEARER_PREFIX,
    TOKEN_COOKIE,
};
use crate::web::dto::{DeletedResponse, LoginQuery, LoginRequest, TokenResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::Credentials;

/// Build the `token` cookie carrying `Bearer <secret>`.
fn token_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs.max(0)))
        .build()
}

/// POST /tokens - Log in and issue a token.
///
/// With `?cookie=true` the credential is also set as a cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let user = check_credentials(state.db.pool(), &req.username, &req.password).await?;

    let issued = TokenStore::new(state.db.pool(), &state.auth)
        .issue(user.id)
        .await?;

    tracing::info!(user_id = %user.id, token_id = %issued.token.id, "User logged in");

    let jar = if query.cookie {
        let max_age = (issued.token.expires_at - Utc::now()).num_seconds();
        jar.add(token_cookie(
            format!("{BEARER_PREFIX}{}", issued.secret),
            max_age,
            state.production,
        ))
    } else {
        jar
    };

    Ok((jar, Json(TokenResponse::from(issued))))
}

/// DELETE /tokens - Log out by deleting the presented token.
///
/// Uses the same transports as authentication. The cookie is always cleared.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<DeletedResponse>), ApiError> {
    let credentials = Credentials::from_headers(&headers);

    let secret = extract_credential(credentials.cookie.as_deref(), credentials.header.as_deref())
        .map_err(|e| match e {
            AuthError::MissingCredential => {
                ApiError::bad_request("authentication token not attached to the request")
            }
            _ => ApiError::bad_request("invalid token"),
        })?;

    let store = TokenStore::new(state.db.pool(), &state.auth);
    let token = store
        .find_by_secret(secret)
        .await?
        .ok_or_else(|| ApiError::bad_request("invalid token"))?;
    let deleted = store.revoke(&token).await?;

    tracing::info!(user_id = %token.user_id, token_id = %token.id, "User logged out");

    let mut removal = token_cookie(String::new(), 0, state.production);
    removal.make_removal();

    Ok((jar.add(removal), Json(DeletedResponse { deleted })))
}
