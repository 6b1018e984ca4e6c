//! Extractors resolving the caller from the `Authorization` header

use axum::{extract::FromRequestParts, http::request::Parts};
use http::HeaderMap;
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtService};
use crate::state::AppState;

/// Validate the bearer token in `headers`.
///
/// `Ok(None)` when no `Authorization` header is present at all.
pub fn authenticate(
    jwt: &JwtService,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return Ok(None);
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = jwt.validate_token(token).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::from(e)
    })?;

    CurrentUser::try_from(claims).map(Some).map_err(AppError::from)
}

/// Required authentication
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(&state.jwt, &parts.headers)?.ok_or_else(|| {
            tracing::debug!(uri = %parts.uri, "Missing Authorization header");
            AppError::not_authenticated()
        })?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Optional authentication: guests get `None`, a bad token is still rejected
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&state.jwt, &parts.headers).map(MaybeUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::error::ErrorCode;
    use uuid::Uuid;

    fn jwt() -> JwtService {
        JwtService::new("test-secret-at-least-32-bytes-long!!", None)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_no_header_is_guest() {
        assert!(authenticate(&jwt(), &HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn test_valid_bearer() {
        let id = Uuid::new_v4();
        let token = jwt().generate_token(id, None, Duration::minutes(5)).unwrap();
        let user = authenticate(&jwt(), &headers(&format!("Bearer {token}")))
            .unwrap()
            .unwrap();
        assert_eq!(user.id, id);
    }

    #[test]
    fn test_malformed_header_rejected() {
        let err = authenticate(&jwt(), &headers("Token abc")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token_code() {
        let token = jwt()
            .generate_token(Uuid::new_v4(), None, Duration::minutes(-10))
            .unwrap();
        let err = authenticate(&jwt(), &headers(&format!("Bearer {token}"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }
}
