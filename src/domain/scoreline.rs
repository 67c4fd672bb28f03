//! Scorelines and match outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound accepted for a single side's goals.
pub const MAX_GOALS: i64 = 99;

/// Result direction of a scoreline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

/// A validated (home, away) goal pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScorelineError {
    #[error("score must be non-negative, got {0}")]
    Negative(i64),
    #[error("score must be at most {MAX_GOALS}, got {0}")]
    TooLarge(i64),
}

impl Scoreline {
    /// Build a scoreline from raw integers, rejecting negative or absurd values.
    pub fn new(home: i64, away: i64) -> Result<Self, ScorelineError> {
        Ok(Scoreline {
            home: check_goals(home)?,
            away: check_goals(away)?,
        })
    }

    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::Home,
            std::cmp::Ordering::Less => Outcome::Away,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Absolute goal difference.
    pub fn goal_difference(&self) -> u32 {
        self.home.abs_diff(self.away)
    }
}

impl std::fmt::Display for Scoreline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

fn check_goals(goals: i64) -> Result<u32, ScorelineError> {
    if goals < 0 {
        return Err(ScorelineError::Negative(goals));
    }
    if goals > MAX_GOALS {
        return Err(ScorelineError::TooLarge(goals));
    }
    Ok(goals as u32)
}
