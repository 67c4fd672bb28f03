//! Point calculation for a single prediction.
//!
//! Three independent awards stack additively:
//! - outcome: correct result direction, 2 for a draw and 1 otherwise
//! - goal difference: absolute difference matches, 2
//! - exact score: both sides match, 4
//!
//! A doubled prediction earns twice the sum.

use crate::domain::{FixtureStatus, Outcome, PredictionId, Scoreline};
use thiserror::Error;

pub const DRAW_OUTCOME_POINTS: i64 = 2;
pub const WIN_OUTCOME_POINTS: i64 = 1;
pub const GOAL_DIFFERENCE_POINTS: i64 = 2;
pub const EXACT_SCORE_POINTS: i64 = 4;
pub const DOUBLE_MULTIPLIER: i64 = 2;

/// Points for `predicted` against the final `actual` score.
pub fn points_for(actual: Scoreline, predicted: Scoreline, is_double: bool) -> i64 {
    let mut points = 0;

    let outcome = actual.outcome();
    if outcome == predicted.outcome() {
        points += match outcome {
            Outcome::Draw => DRAW_OUTCOME_POINTS,
            Outcome::Home | Outcome::Away => WIN_OUTCOME_POINTS,
        };
    }

    if actual.goal_difference() == predicted.goal_difference() {
        points += GOAL_DIFFERENCE_POINTS;
    }

    if actual == predicted {
        points += EXACT_SCORE_POINTS;
    }

    if is_double {
        points *= DOUBLE_MULTIPLIER;
    }

    points
}

/// Raw stored columns for one prediction joined with its fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRow {
    pub prediction_id: i64,
    pub fixture_status: String,
    pub fixture_home_score: Option<i64>,
    pub fixture_away_score: Option<i64>,
    pub predicted_home: i64,
    pub predicted_away: i64,
    pub is_double: bool,
}

/// Typed scoring input, validated from a [`ScoringRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringInput {
    pub prediction_id: PredictionId,
    pub status: FixtureStatus,
    pub actual: Option<Scoreline>,
    pub predicted: Scoreline,
    pub is_double: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prediction {prediction_id} has malformed data: {reason}")]
pub struct MalformedRow {
    pub prediction_id: PredictionId,
    pub reason: String,
}

impl TryFrom<ScoringRow> for ScoringInput {
    type Error = MalformedRow;

    fn try_from(row: ScoringRow) -> Result<Self, Self::Error> {
        let prediction_id = PredictionId(row.prediction_id);
        let malformed = |reason: String| MalformedRow {
            prediction_id,
            reason,
        };

        let status: FixtureStatus = row
            .fixture_status
            .parse()
            .map_err(|e: crate::domain::FixtureError| malformed(e.to_string()))?;

        let actual = match (row.fixture_home_score, row.fixture_away_score) {
            (Some(h), Some(a)) => Some(
                Scoreline::new(h, a).map_err(|e| malformed(format!("fixture score: {}", e)))?,
            ),
            (None, None) => None,
            _ => return Err(malformed("fixture has a partial score".to_string())),
        };

        let predicted = Scoreline::new(row.predicted_home, row.predicted_away)
            .map_err(|e| malformed(format!("predicted score: {}", e)))?;

        Ok(ScoringInput {
            prediction_id,
            status,
            actual,
            predicted,
            is_double: row.is_double,
        })
    }
}

impl ScoringInput {
    /// Points earned, or `None` when the fixture has no final score yet.
    pub fn evaluate(&self) -> Option<i64> {
        if self.status != FixtureStatus::Finished {
            return None;
        }
        self.actual
            .map(|actual| points_for(actual, self.predicted, self.is_double))
    }
}
