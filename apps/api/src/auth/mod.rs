//! Sign-up, login and the request extractors that resolve who is calling.

pub mod handlers;
pub mod password;
pub mod sessions;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::users::{find_by_email, UserRecord};

/// The bearer token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// A signed-in user, resolved from the bearer token's session.
/// Rejects with 401 when the token is missing or unknown.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: String,
    pub user: UserRecord,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = sessions::resolve(&state.repo, token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let user = find_by_email(&state.repo, &session.email)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser {
            token: token.to_string(),
            user,
        })
    }
}

/// Admin access: the bearer token must equal `ADMIN_TOKEN`. Anything else is 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) if token == state.config.admin_token => Ok(AdminGuard),
            _ => Err(AppError::Forbidden),
        }
    }
}
