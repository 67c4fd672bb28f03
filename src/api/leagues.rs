use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::api::leaderboard::{parse_gameweek, LeaderboardQuery};
use crate::api::AppState;
use crate::db::repo::LeagueSummary;
use crate::domain::{League, LeagueId};
use crate::engine::LeaderboardEntry;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateLeagueRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinLeagueRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueLeaderboardResponse {
    pub league: League,
    pub entries: Vec<LeaderboardEntry>,
}

pub async fn create_league(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateLeagueRequest>,
) -> Result<(StatusCode, Json<League>), AppError> {
    let league = state.leagues.create(user.id, &body.name).await?;
    Ok((StatusCode::CREATED, Json(league)))
}

pub async fn join_league(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<JoinLeagueRequest>,
) -> Result<Json<League>, AppError> {
    Ok(Json(state.leagues.join(user.id, &body.code).await?))
}

pub async fn list_leagues(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LeagueSummary>>, AppError> {
    Ok(Json(state.leagues.list_for_user(user.id).await?))
}

pub async fn league_leaderboard(
    Path(id): Path<i64>,
    Query(params): Query<LeaderboardQuery>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<LeagueLeaderboardResponse>, AppError> {
    let gameweek = parse_gameweek(params.gameweek)?;
    let (league, entries) = state
        .leagues
        .standings(user.id, LeagueId(id), gameweek)
        .await?;

    Ok(Json(LeagueLeaderboardResponse { league, entries }))
}

pub async fn leave_league(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    state.leagues.leave(user.id, LeagueId(id)).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Left league",
    })))
}
