use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::engine::{rank_totals, LeaderboardEntry};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub gameweek: Option<i64>,
}

/// Validate an optional gameweek query parameter.
pub(crate) fn parse_gameweek(gameweek: Option<i64>) -> Result<Option<i64>, AppError> {
    match gameweek {
        Some(gw) if gw < 1 => Err(AppError::BadRequest(
            "gameweek must be at least 1".to_string(),
        )),
        other => Ok(other),
    }
}

pub async fn get_leaderboard(
    Query(params): Query<LeaderboardQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let gameweek = parse_gameweek(params.gameweek)?;
    let totals = state.repo.query_user_totals(gameweek).await?;
    Ok(Json(rank_totals(totals)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gameweek_rejects_non_positive() {
        assert!(parse_gameweek(Some(0)).is_err());
        assert_eq!(parse_gameweek(Some(5)).unwrap(), Some(5));
        assert_eq!(parse_gameweek(None).unwrap(), None);
    }
}
