use crate::db::repo::{is_unique_violation, LeagueSummary};
use crate::db::Repository;
use crate::domain::league::{generate_join_code, normalize_join_code, normalize_league_name};
use crate::domain::{League, LeagueId, UserId};
use crate::engine::{rank_totals, LeaderboardEntry};
use std::sync::Arc;
use thiserror::Error;

/// Attempts at drawing an unused join code before giving up.
const CODE_ATTEMPTS: usize = 5;

/// Private league membership and standings.
#[derive(Clone)]
pub struct LeagueDirectory {
    repo: Arc<Repository>,
}

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("league {0} not found")]
    NotFound(LeagueId),
    #[error("no league with that join code")]
    UnknownCode,
    #[error("{0}")]
    InvalidName(#[from] crate::domain::league::LeagueNameError),
    #[error("not a member of league {0}")]
    NotMember(LeagueId),
    #[error("the owner cannot leave league {0}")]
    OwnerCannotLeave(LeagueId),
    #[error("could not allocate a unique join code")]
    CodeExhausted,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl LeagueDirectory {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Create a league owned (and joined) by `owner`.
    pub async fn create(&self, owner: UserId, name: &str) -> Result<League, LeagueError> {
        let name = normalize_league_name(name)?;

        for _ in 0..CODE_ATTEMPTS {
            let code = generate_join_code();
            match self.repo.insert_league(&name, &code, owner).await {
                Ok(league) => {
                    tracing::info!(league_id = %league.id, owner = %owner, "League created");
                    return Ok(league);
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(code = %code, "Join code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LeagueError::CodeExhausted)
    }

    /// Join by code. Joining a league twice is a no-op.
    pub async fn join(&self, user: UserId, code: &str) -> Result<League, LeagueError> {
        let code = normalize_join_code(code).ok_or(LeagueError::UnknownCode)?;
        let league = self
            .repo
            .find_league_by_code(&code)
            .await?
            .ok_or(LeagueError::UnknownCode)?;

        if self.repo.add_league_member(league.id, user).await? {
            tracing::info!(league_id = %league.id, user_id = %user, "Joined league");
        }
        Ok(league)
    }

    pub async fn leave(&self, user: UserId, league_id: LeagueId) -> Result<(), LeagueError> {
        let league = self
            .repo
            .get_league(league_id)
            .await?
            .ok_or(LeagueError::NotFound(league_id))?;

        if league.owner_id == user {
            return Err(LeagueError::OwnerCannotLeave(league_id));
        }
        if !self.repo.remove_league_member(league_id, user).await? {
            return Err(LeagueError::NotMember(league_id));
        }
        Ok(())
    }

    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<LeagueSummary>, LeagueError> {
        Ok(self.repo.list_user_leagues(user).await?)
    }

    /// Ranked standings of a league's members. Only members may view them.
    pub async fn standings(
        &self,
        viewer: UserId,
        league_id: LeagueId,
        gameweek: Option<i64>,
    ) -> Result<(League, Vec<LeaderboardEntry>), LeagueError> {
        let (league, is_member) = futures::try_join!(
            self.repo.get_league(league_id),
            self.repo.is_league_member(league_id, viewer)
        )?;
        let league = league.ok_or(LeagueError::NotFound(league_id))?;
        if !is_member {
            return Err(LeagueError::NotMember(league_id));
        }

        let totals = self.repo.query_league_totals(league_id, gameweek).await?;
        Ok((league, rank_totals(totals)))
    }
}
