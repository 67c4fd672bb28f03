use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::auth::Admin;
use crate::api::fixtures::FixtureDto;
use crate::api::AppState;
use crate::domain::{FixtureId, NewFixture, PredictionId, Scoreline, TimeMs};
use crate::error::AppError;
use crate::orchestration::{PointsOutcome, ReconcileReport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFixtureRequest {
    pub home_team: String,
    pub away_team: String,
    pub kickoff: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub gameweek: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScoresRequest {
    pub home_score: i64,
    pub away_score: i64,
}

pub async fn create_fixture(
    _admin: Admin,
    State(state): State<AppState>,
    Json(body): Json<CreateFixtureRequest>,
) -> Result<(StatusCode, Json<FixtureDto>), AppError> {
    let new_fixture = NewFixture::new(
        &body.home_team,
        &body.away_team,
        TimeMs::from(body.kickoff),
        TimeMs::from(body.deadline),
        body.gameweek,
    )?;

    let fixture = state.repo.insert_fixture(&new_fixture).await?;
    tracing::info!(
        fixture_id = %fixture.id,
        home = %fixture.home_team,
        away = %fixture.away_team,
        gameweek = fixture.gameweek,
        "Fixture created"
    );

    Ok((StatusCode::CREATED, Json(fixture.into())))
}

/// Record (or correct) a fixture's final score and rescore its predictions.
pub async fn set_scores(
    _admin: Admin,
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<SetScoresRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let fixture_id = FixtureId(id);
    let score = Scoreline::new(body.home_score, body.away_score)?;

    if !state.repo.set_fixture_result(fixture_id, score).await? {
        return Err(AppError::NotFound(format!("fixture {} not found", id)));
    }
    tracing::info!(fixture_id = %fixture_id, score = %score, "Fixture result recorded");

    let recalculation = state.recalculator.recalculate_fixture(fixture_id).await?;
    let fixture = state
        .repo
        .get_fixture(fixture_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("fixture {} not found", id)))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Scores updated, {} predictions recalculated", recalculation.processed),
        "fixture": FixtureDto::from(fixture),
        "recalculation": recalculation,
    })))
}

pub async fn recalculate_all(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let report = state.recalculator.recalculate_all().await?;

    Ok(Json(serde_json::json!({
        "success": report.failures.is_empty(),
        "message": format!("Recalculated {} predictions", report.processed),
        "processed": report.processed,
        "failures": report.failures,
    })))
}

pub async fn reconcile(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<Json<ReconcileReport>, AppError> {
    Ok(Json(state.reconciler.reconcile().await?))
}

pub async fn calculate_points(
    _admin: Admin,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.recalculator.calculate_points(PredictionId(id)).await?;

    let body = match outcome {
        PointsOutcome::Awarded(points) => serde_json::json!({
            "success": true,
            "predictionId": id,
            "status": "awarded",
            "points": points,
        }),
        PointsOutcome::NotFinished => serde_json::json!({
            "success": true,
            "predictionId": id,
            "status": "notFinished",
            "points": null,
        }),
    };
    Ok(Json(body))
}
