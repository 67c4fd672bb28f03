//! Fixture records and their status lifecycle.

use crate::domain::{FixtureId, Scoreline, ScorelineError, TimeMs};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Upcoming,
    Live,
    Finished,
}

impl FixtureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureStatus::Upcoming => "upcoming",
            FixtureStatus::Live => "live",
            FixtureStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixtureStatus {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(FixtureStatus::Upcoming),
            "live" => Ok(FixtureStatus::Live),
            "finished" => Ok(FixtureStatus::Finished),
            other => Err(FixtureError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("team names must be non-empty and distinct")]
    InvalidTeams,
    #[error("deadline must not be after kickoff")]
    DeadlineAfterKickoff,
    #[error("gameweek must be at least 1, got {0}")]
    InvalidGameweek(i64),
    #[error("fixture has only one of home/away score set")]
    PartialScore,
    #[error("unknown fixture status: {0}")]
    UnknownStatus(String),
    #[error("invalid score: {0}")]
    InvalidScore(#[from] ScorelineError),
}

/// A scheduled match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: TimeMs,
    pub deadline: TimeMs,
    /// Final (or corrected) score; present iff both stored scores are set.
    pub result: Option<Scoreline>,
    pub gameweek: i64,
    pub status: FixtureStatus,
}

impl Fixture {
    /// Assemble a fixture from stored columns, rejecting half-set scores.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: FixtureId,
        home_team: String,
        away_team: String,
        kickoff: TimeMs,
        deadline: TimeMs,
        home_score: Option<i64>,
        away_score: Option<i64>,
        gameweek: i64,
        status: &str,
    ) -> Result<Self, FixtureError> {
        let result = match (home_score, away_score) {
            (Some(h), Some(a)) => Some(Scoreline::new(h, a)?),
            (None, None) => None,
            _ => return Err(FixtureError::PartialScore),
        };

        Ok(Fixture {
            id,
            home_team,
            away_team,
            kickoff,
            deadline,
            result,
            gameweek,
            status: status.parse()?,
        })
    }

    /// Predictions may be changed only strictly before the deadline.
    pub fn accepts_predictions(&self, now: TimeMs) -> bool {
        now < self.deadline
    }

    /// The score to grade against, only once the fixture is finished.
    pub fn final_score(&self) -> Option<Scoreline> {
        match self.status {
            FixtureStatus::Finished => self.result,
            _ => None,
        }
    }

    /// Status this fixture should move to at `now`, or `None` if it is current.
    ///
    /// Rules are evaluated in order: scores present and not yet finished
    /// finishes it; kickoff reached while upcoming makes it live.
    pub fn next_status(&self, now: TimeMs) -> Option<FixtureStatus> {
        if self.result.is_some() && self.status != FixtureStatus::Finished {
            return Some(FixtureStatus::Finished);
        }
        if now >= self.kickoff && self.status == FixtureStatus::Upcoming {
            return Some(FixtureStatus::Live);
        }
        None
    }
}

/// Fields for creating a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFixture {
    pub home_team: String,
    pub away_team: String,
    pub kickoff: TimeMs,
    pub deadline: TimeMs,
    pub gameweek: i64,
}

impl NewFixture {
    pub fn new(
        home_team: &str,
        away_team: &str,
        kickoff: TimeMs,
        deadline: TimeMs,
        gameweek: i64,
    ) -> Result<Self, FixtureError> {
        let home_team = home_team.trim();
        let away_team = away_team.trim();
        if home_team.is_empty()
            || away_team.is_empty()
            || home_team.eq_ignore_ascii_case(away_team)
        {
            return Err(FixtureError::InvalidTeams);
        }
        if deadline > kickoff {
            return Err(FixtureError::DeadlineAfterKickoff);
        }
        if gameweek < 1 {
            return Err(FixtureError::InvalidGameweek(gameweek));
        }

        Ok(NewFixture {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            kickoff,
            deadline,
            gameweek,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(status: FixtureStatus, result: Option<(i64, i64)>) -> Fixture {
        Fixture::from_parts(
            FixtureId(1),
            "Arsenal".to_string(),
            "Chelsea".to_string(),
            TimeMs::new(10_000),
            TimeMs::new(9_000),
            result.map(|r| r.0),
            result.map(|r| r.1),
            1,
            status.as_str(),
        )
        .unwrap()
    }

    #[test]
    fn test_scores_set_finishes_upcoming_fixture() {
        let f = fixture(FixtureStatus::Upcoming, Some((2, 1)));
        assert_eq!(f.next_status(TimeMs::new(0)), Some(FixtureStatus::Finished));
    }

    #[test]
    fn test_scores_set_finishes_live_fixture() {
        let f = fixture(FixtureStatus::Live, Some((0, 0)));
        assert_eq!(
            f.next_status(TimeMs::new(20_000)),
            Some(FixtureStatus::Finished)
        );
    }

    #[test]
    fn test_kickoff_reached_goes_live() {
        let f = fixture(FixtureStatus::Upcoming, None);
        assert_eq!(f.next_status(TimeMs::new(9_999)), None);
        assert_eq!(f.next_status(TimeMs::new(10_000)), Some(FixtureStatus::Live));
    }

    #[test]
    fn test_settled_fixtures_do_not_move() {
        assert_eq!(
            fixture(FixtureStatus::Finished, Some((1, 0))).next_status(TimeMs::new(99_999)),
            None
        );
        assert_eq!(
            fixture(FixtureStatus::Live, None).next_status(TimeMs::new(99_999)),
            None
        );
    }

    #[test]
    fn test_final_score_requires_finished_status() {
        assert_eq!(fixture(FixtureStatus::Upcoming, Some((2, 1))).final_score(), None);
        assert_eq!(
            fixture(FixtureStatus::Finished, Some((2, 1))).final_score(),
            Some(Scoreline::new(2, 1).unwrap())
        );
    }

    #[test]
    fn test_deadline_is_exclusive() {
        let f = fixture(FixtureStatus::Upcoming, None);
        assert!(f.accepts_predictions(TimeMs::new(8_999)));
        assert!(!f.accepts_predictions(TimeMs::new(9_000)));
    }

    #[test]
    fn test_partial_score_rejected() {
        let err = Fixture::from_parts(
            FixtureId(1),
            "A".to_string(),
            "B".to_string(),
            TimeMs::new(0),
            TimeMs::new(0),
            Some(1),
            None,
            1,
            "upcoming",
        )
        .unwrap_err();
        assert_eq!(err, FixtureError::PartialScore);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert_eq!(
            "postponed".parse::<FixtureStatus>(),
            Err(FixtureError::UnknownStatus("postponed".to_string()))
        );
    }

    #[test]
    fn test_new_fixture_validation() {
        let k = TimeMs::new(10_000);
        assert!(NewFixture::new("Arsenal", "Chelsea", k, TimeMs::new(9_000), 1).is_ok());
        assert_eq!(
            NewFixture::new("Arsenal", " arsenal ", k, TimeMs::new(9_000), 1),
            Err(FixtureError::InvalidTeams)
        );
        assert_eq!(
            NewFixture::new("Arsenal", "Chelsea", k, TimeMs::new(11_000), 1),
            Err(FixtureError::DeadlineAfterKickoff)
        );
        assert_eq!(
            NewFixture::new("Arsenal", "Chelsea", k, TimeMs::new(9_000), 0),
            Err(FixtureError::InvalidGameweek(0))
        );
    }
}
