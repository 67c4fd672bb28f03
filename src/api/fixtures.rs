use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::db::repo::FixtureFilter;
use crate::domain::{Fixture, FixtureId, FixtureStatus};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDto {
    pub id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: String,
    pub deadline: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub gameweek: i64,
    pub status: FixtureStatus,
}

impl From<Fixture> for FixtureDto {
    fn from(f: Fixture) -> Self {
        FixtureDto {
            id: f.id,
            kickoff: f.kickoff.to_string(),
            deadline: f.deadline.to_string(),
            home_score: f.result.map(|r| r.home),
            away_score: f.result.map(|r| r.away),
            home_team: f.home_team,
            away_team: f.away_team,
            gameweek: f.gameweek,
            status: f.status,
        }
    }
}

/// Reconcile statuses, then list fixtures matching `filter`.
async fn fresh_fixtures(
    state: &AppState,
    filter: FixtureFilter,
) -> Result<Vec<FixtureDto>, AppError> {
    state.reconciler.reconcile().await?;
    let fixtures = state.repo.list_fixtures(filter).await?;
    Ok(fixtures.into_iter().map(FixtureDto::from).collect())
}

pub async fn list_fixtures(
    State(state): State<AppState>,
) -> Result<Json<Vec<FixtureDto>>, AppError> {
    Ok(Json(fresh_fixtures(&state, FixtureFilter::default()).await?))
}

pub async fn list_upcoming(
    State(state): State<AppState>,
) -> Result<Json<Vec<FixtureDto>>, AppError> {
    let filter = FixtureFilter {
        gameweek: None,
        status: Some(FixtureStatus::Upcoming),
    };
    Ok(Json(fresh_fixtures(&state, filter).await?))
}

pub async fn list_gameweek(
    Path(gameweek): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<FixtureDto>>, AppError> {
    if gameweek < 1 {
        return Err(AppError::BadRequest("gameweek must be at least 1".to_string()));
    }
    let filter = FixtureFilter {
        gameweek: Some(gameweek),
        status: None,
    };
    Ok(Json(fresh_fixtures(&state, filter).await?))
}

pub async fn get_fixture(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<FixtureDto>, AppError> {
    state.reconciler.reconcile().await?;
    let fixture = state
        .repo
        .get_fixture(FixtureId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("fixture {} not found", id)))?;
    Ok(Json(fixture.into()))
}
