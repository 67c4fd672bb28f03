use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::api::AppState;
use crate::domain::{FixtureId, Prediction, PredictionId, TimeMs};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPredictionRequest {
    pub fixture_id: i64,
    pub home_score: i64,
    pub away_score: i64,
    #[serde(default)]
    pub is_double: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsQuery {
    pub gameweek: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDto {
    pub id: PredictionId,
    pub fixture_id: FixtureId,
    pub home_score: u32,
    pub away_score: u32,
    pub is_double: bool,
    pub points: i64,
}

impl From<Prediction> for PredictionDto {
    fn from(p: Prediction) -> Self {
        PredictionDto {
            id: p.id,
            fixture_id: p.fixture_id,
            home_score: p.pick.home,
            away_score: p.pick.away,
            is_double: p.is_double,
            points: p.points,
        }
    }
}

pub async fn submit_prediction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SubmitPredictionRequest>,
) -> Result<Json<PredictionDto>, AppError> {
    let prediction = state
        .predictions
        .submit(
            user.id,
            FixtureId(body.fixture_id),
            body.home_score,
            body.away_score,
            body.is_double,
            TimeMs::now(),
        )
        .await?;

    Ok(Json(prediction.into()))
}

pub async fn list_predictions(
    Query(params): Query<PredictionsQuery>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PredictionDto>>, AppError> {
    let predictions = state
        .predictions
        .list_for_user(user.id, params.gameweek)
        .await?;

    Ok(Json(predictions.into_iter().map(PredictionDto::from).collect()))
}

pub async fn delete_prediction(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .predictions
        .withdraw(user.id, PredictionId(id), TimeMs::now())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Prediction deleted",
    })))
}
