//! Request identity extractors.
//!
//! Authentication happens upstream; requests arrive with the caller's user id
//! in `X-User-Id`. Admin routes additionally require `X-Admin-Token`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::domain::{User, UserId};
use crate::error::AppError;

pub const USER_HEADER: &str = "x-user-id";
pub const ADMIN_HEADER: &str = "x-admin-token";

/// The registered user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing X-User-Id header".to_string()))?;
        let id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("invalid X-User-Id header".to_string()))?;

        let user = state
            .repo
            .get_user(UserId(id))
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

        Ok(CurrentUser(user))
    }
}

/// Proof that the request carried the configured admin token.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing X-Admin-Token header".to_string()))?;

        if token != state.config.admin_token {
            return Err(AppError::Forbidden("invalid admin token".to_string()));
        }
        Ok(Admin)
    }
}
