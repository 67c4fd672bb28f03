//! A user's forecast for one fixture.

use crate::domain::{FixtureId, PredictionId, Scoreline, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub user_id: UserId,
    pub fixture_id: FixtureId,
    pub pick: Scoreline,
    pub is_double: bool,
    /// Written only by the scoring engine.
    pub points: i64,
}
