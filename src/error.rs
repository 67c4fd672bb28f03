use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::{FixtureError, ScorelineError, UserError};
use crate::orchestration::{LeagueError, PredictionError, ScoringError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error");
        AppError::Internal(err.to_string())
    }
}

impl From<FixtureError> for AppError {
    fn from(err: FixtureError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ScorelineError> for AppError {
    fn from(err: ScorelineError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::NotFound(_) => AppError::NotFound(err.to_string()),
            ScoringError::Malformed(_) => AppError::Internal(err.to_string()),
            ScoringError::Db(e) => e.into(),
        }
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::FixtureNotFound(_) | PredictionError::PredictionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            PredictionError::DeadlinePassed(_)
            | PredictionError::DoubleLocked(_)
            | PredictionError::InvalidScore(_) => AppError::BadRequest(err.to_string()),
            PredictionError::Db(e) => e.into(),
        }
    }
}

impl From<LeagueError> for AppError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::NotFound(_) | LeagueError::UnknownCode => {
                AppError::NotFound(err.to_string())
            }
            LeagueError::InvalidName(_) | LeagueError::OwnerCannotLeave(_) => {
                AppError::BadRequest(err.to_string())
            }
            LeagueError::NotMember(_) => AppError::Forbidden(err.to_string()),
            LeagueError::CodeExhausted => AppError::Internal(err.to_string()),
            LeagueError::Db(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixtureId, LeagueId};

    #[test]
    fn prediction_errors_map_to_status() {
        let resp = AppError::from(PredictionError::DeadlinePassed(FixtureId(1))).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(PredictionError::FixtureNotFound(FixtureId(1))).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn league_membership_is_forbidden() {
        let resp = AppError::from(LeagueError::NotMember(LeagueId(3))).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
