//! Bearer token authentication extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::auth::{Resolver, TOKEN_COOKIE};
use crate::db::{AuthToken, User};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Raw credential transports of a request.
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    pub cookie: Option<String>,
    pub header: Option<String>,
}

impl Credentials {
    /// Read the `token` cookie and the `Authorization` header.
    ///
    /// A header with non-ASCII bytes is still a presented credential. Its
    /// bytes are decoded lossily so it fails as malformed or unknown.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookie = CookieJar::from_headers(headers)
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string());
        let header = headers
            .get(AUTHORIZATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Self { cookie, header }
    }
}

/// The authenticated principal and the token it presented.
///
/// Handlers taking this extractor reject unauthenticated requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: AuthToken,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers);

        let (user, token) = Resolver::new(state.db.pool(), &state.auth)
            .resolve(credentials.cookie.as_deref(), credentials.header.as_deref())
            .await
            .inspect_err(|_| {
                tracing::debug!(path = %parts.uri.path(), "Unauthenticated request");
            })?;

        Ok(CurrentUser { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{extract_credential, AuthError};
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn test_credentials_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=Bearer%20xyz"),
        );

        let credentials = Credentials::from_headers(&headers);
        assert_eq!(credentials.header.as_deref(), Some("Bearer abc"));
        assert_eq!(credentials.cookie.as_deref(), Some("Bearer xyz"));
    }

    #[test]
    fn test_non_ascii_header_is_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );

        let credentials = Credentials::from_headers(&headers);
        let header = credentials.header.as_deref();
        assert!(header.is_some_and(|h| h.starts_with("Bearer ")));
        assert!(extract_credential(None, header).is_ok());

        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"\xff").unwrap());
        let credentials = Credentials::from_headers(&headers);
        assert!(matches!(
            extract_credential(None, credentials.header.as_deref()),
            Err(AuthError::MalformedCredential)
        ));
    }

    #[test]
    fn test_credentials_absent() {
        let credentials = Credentials::from_headers(&HeaderMap::new());
        assert!(credentials.cookie.is_none());
        assert!(credentials.header.is_none());
    }
}
