use crate::db::Repository;
use crate::domain::{
    FixtureId, Prediction, PredictionId, Scoreline, ScorelineError, TimeMs, UserId,
};
use std::sync::Arc;
use thiserror::Error;

/// Enforces the user-facing prediction rules: deadlines, ownership and the
/// one-double-per-gameweek limit.
#[derive(Clone)]
pub struct PredictionBook {
    repo: Arc<Repository>,
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("fixture {0} not found")]
    FixtureNotFound(FixtureId),
    #[error("prediction {0} not found")]
    PredictionNotFound(PredictionId),
    #[error("prediction deadline for fixture {0} has passed")]
    DeadlinePassed(FixtureId),
    #[error("double is locked on fixture {0} whose deadline has passed")]
    DoubleLocked(FixtureId),
    #[error("invalid predicted score: {0}")]
    InvalidScore(#[from] ScorelineError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl PredictionBook {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Create or replace the user's prediction for a fixture.
    ///
    /// All checks run before anything is written.
    pub async fn submit(
        &self,
        user_id: UserId,
        fixture_id: FixtureId,
        home: i64,
        away: i64,
        is_double: bool,
        now: TimeMs,
    ) -> Result<Prediction, PredictionError> {
        let pick = Scoreline::new(home, away)?;
        let fixture = self
            .repo
            .get_fixture(fixture_id)
            .await?
            .ok_or(PredictionError::FixtureNotFound(fixture_id))?;

        if !fixture.accepts_predictions(now) {
            return Err(PredictionError::DeadlinePassed(fixture_id));
        }

        if is_double {
            // Moving the double off a frozen prediction would edit it after its deadline.
            if let Some(holder) = self
                .repo
                .find_double_in_gameweek(user_id, fixture.gameweek, fixture_id)
                .await?
            {
                if now >= holder.deadline {
                    return Err(PredictionError::DoubleLocked(holder.fixture_id));
                }
            }
        }

        let prediction = self
            .repo
            .upsert_prediction(user_id, &fixture, pick, is_double)
            .await?;

        tracing::info!(
            user_id = %user_id,
            fixture_id = %fixture_id,
            pick = %pick,
            is_double,
            "Prediction saved"
        );
        Ok(prediction)
    }

    /// Delete one of the user's own predictions before its deadline.
    pub async fn withdraw(
        &self,
        user_id: UserId,
        prediction_id: PredictionId,
        now: TimeMs,
    ) -> Result<(), PredictionError> {
        let prediction = self
            .repo
            .get_prediction(prediction_id)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or(PredictionError::PredictionNotFound(prediction_id))?;

        let fixture = self
            .repo
            .get_fixture(prediction.fixture_id)
            .await?
            .ok_or(PredictionError::FixtureNotFound(prediction.fixture_id))?;

        if !fixture.accepts_predictions(now) {
            return Err(PredictionError::DeadlinePassed(fixture.id));
        }

        self.repo.delete_prediction(prediction_id).await?;
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: UserId,
        gameweek: Option<i64>,
    ) -> Result<Vec<Prediction>, PredictionError> {
        Ok(self.repo.list_user_predictions(user_id, gameweek).await?)
    }
}
