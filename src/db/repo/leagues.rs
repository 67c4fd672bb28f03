//! League and membership operations.

use super::Repository;
use crate::domain::{League, LeagueId, TimeMs, UserId};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// A league together with its current member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSummary {
    #[serde(flatten)]
    pub league: League,
    pub member_count: i64,
}

impl Repository {
    /// Create a league and enrol its owner in one transaction.
    ///
    /// # Errors
    /// Returns a unique violation if `code` is already taken.
    pub async fn insert_league(
        &self,
        name: &str,
        code: &str,
        owner_id: UserId,
    ) -> Result<League, sqlx::Error> {
        let now = TimeMs::now().as_ms();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO leagues (name, code, owner_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(code)
        .bind(owner_id.as_i64())
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let id = LeagueId(result.last_insert_rowid());

        sqlx::query("INSERT INTO league_members (league_id, user_id, joined_at) VALUES (?, ?, ?)")
            .bind(id.as_i64())
            .bind(owner_id.as_i64())
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(League {
            id,
            name: name.to_string(),
            code: code.to_string(),
            owner_id,
        })
    }

    pub async fn get_league(&self, id: LeagueId) -> Result<Option<League>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, code, owner_id FROM leagues WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(league_from_row))
    }

    pub async fn find_league_by_code(&self, code: &str) -> Result<Option<League>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, code, owner_id FROM leagues WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(league_from_row))
    }

    /// Add a member. Returns false if they already belonged.
    pub async fn add_league_member(
        &self,
        league_id: LeagueId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO league_members (league_id, user_id, joined_at)
            VALUES (?, ?, ?)
            ON CONFLICT(league_id, user_id) DO NOTHING
            "#,
        )
        .bind(league_id.as_i64())
        .bind(user_id.as_i64())
        .bind(TimeMs::now().as_ms())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a member. Returns whether they were a member.
    pub async fn remove_league_member(
        &self,
        league_id: LeagueId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM league_members WHERE league_id = ? AND user_id = ?")
            .bind(league_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_league_member(
        &self,
        league_id: LeagueId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM league_members WHERE league_id = ? AND user_id = ?) AS member",
        )
        .bind(league_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<bool, _>("member"))
    }

    /// Leagues a user belongs to, ordered by name.
    pub async fn list_user_leagues(&self, user_id: UserId) -> Result<Vec<LeagueSummary>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.name, l.code, l.owner_id,
                   (SELECT COUNT(*) FROM league_members c WHERE c.league_id = l.id) AS member_count
            FROM leagues l
            JOIN league_members m ON m.league_id = l.id
            WHERE m.user_id = ?
            ORDER BY l.name ASC, l.id ASC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| LeagueSummary {
                league: league_from_row(row),
                member_count: row.get("member_count"),
            })
            .collect())
    }
}

fn league_from_row(row: &SqliteRow) -> League {
    League {
        id: LeagueId(row.get("id")),
        name: row.get("name"),
        code: row.get("code"),
        owner_id: UserId(row.get("owner_id")),
    }
}
