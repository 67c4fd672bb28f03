use crate::db::Repository;
use crate::domain::{FixtureId, PredictionId};
use crate::engine::{MalformedRow, ScoringInput};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Recomputes and persists prediction points from fixture results.
#[derive(Clone)]
pub struct Recalculator {
    repo: Arc<Repository>,
}

/// Result of scoring one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsOutcome {
    /// Points were computed and stored.
    Awarded(i64),
    /// The fixture has no final score yet; nothing was written.
    NotFinished,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("prediction {0} not found")]
    NotFound(PredictionId),
    #[error(transparent)]
    Malformed(#[from] MalformedRow),
    #[error("failed to persist points: {0}")]
    Db(#[from] sqlx::Error),
}

/// One prediction the batch could not score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationFailure {
    pub prediction_id: PredictionId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationReport {
    /// Predictions scored and persisted.
    pub processed: usize,
    pub failures: Vec<RecalculationFailure>,
}

impl RecalculationReport {
    fn merge(&mut self, other: RecalculationReport) {
        self.processed += other.processed;
        self.failures.extend(other.failures);
    }
}

impl Recalculator {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Recompute points for every prediction on a finished fixture.
    ///
    /// Each prediction is scored independently; failures are collected in the
    /// report and never stop the scan.
    pub async fn recalculate_all(&self) -> Result<RecalculationReport, sqlx::Error> {
        let ids = self.repo.query_scoreable_prediction_ids(None).await?;
        let report = self.score_each(ids).await;

        tracing::info!(
            processed = report.processed,
            failed = report.failures.len(),
            "Recalculated all finished predictions"
        );
        Ok(report)
    }

    /// Recompute points for the predictions of one fixture.
    pub async fn recalculate_fixture(
        &self,
        fixture_id: FixtureId,
    ) -> Result<RecalculationReport, sqlx::Error> {
        let ids = self
            .repo
            .query_scoreable_prediction_ids(Some(fixture_id))
            .await?;
        let report = self.score_each(ids).await;

        tracing::info!(
            fixture_id = %fixture_id,
            processed = report.processed,
            failed = report.failures.len(),
            "Recalculated fixture predictions"
        );
        Ok(report)
    }

    /// Recompute the points of a set of fixtures, merging the reports.
    pub async fn recalculate_fixtures(
        &self,
        fixture_ids: &[FixtureId],
    ) -> Result<RecalculationReport, sqlx::Error> {
        let mut report = RecalculationReport::default();
        for fixture_id in fixture_ids {
            report.merge(self.recalculate_fixture(*fixture_id).await?);
        }
        Ok(report)
    }

    /// Score one prediction and persist the result.
    ///
    /// The read and the write share a transaction so a concurrent result
    /// correction cannot interleave between them.
    pub async fn calculate_points(&self, id: PredictionId) -> Result<PointsOutcome, ScoringError> {
        let mut tx = self.repo.begin().await?;

        let row = Repository::fetch_scoring_row(&mut tx, id)
            .await?
            .ok_or(ScoringError::NotFound(id))?;
        let input = ScoringInput::try_from(row)?;

        let Some(points) = input.evaluate() else {
            return Ok(PointsOutcome::NotFinished);
        };

        Repository::write_points(&mut tx, id, points).await?;
        tx.commit().await?;

        Ok(PointsOutcome::Awarded(points))
    }

    async fn score_each(&self, ids: Vec<PredictionId>) -> RecalculationReport {
        let mut report = RecalculationReport::default();

        for id in ids {
            match self.calculate_points(id).await {
                Ok(PointsOutcome::Awarded(_)) => report.processed += 1,
                // Result withdrawn between listing and scoring.
                Ok(PointsOutcome::NotFinished) => {}
                Err(e) => {
                    tracing::warn!(prediction_id = %id, error = %e, "Failed to score prediction");
                    report.failures.push(RecalculationFailure {
                        prediction_id: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
