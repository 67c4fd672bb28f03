//! Leaderboard aggregation queries.
//!
//! Totals only count predictions on finished fixtures; any points stored on
//! other fixtures are ignored. Every user in scope appears, with 0 when they
//! have nothing to count.

use super::Repository;
use crate::domain::{LeagueId, UserId};
use crate::engine::UserTotal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Repository {
    /// Point totals for every user, optionally restricted to one gameweek.
    pub async fn query_user_totals(
        &self,
        gameweek: Option<i64>,
    ) -> Result<Vec<UserTotal>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id,
                   u.username AS username,
                   COALESCE(SUM(
                       CASE WHEN f.status = 'finished' AND (?1 IS NULL OR f.gameweek = ?1)
                            THEN p.points ELSE 0 END
                   ), 0) AS total_points
            FROM users u
            LEFT JOIN predictions p ON p.user_id = u.id
            LEFT JOIN fixtures f ON f.id = p.fixture_id
            GROUP BY u.id, u.username
            "#,
        )
        .bind(gameweek)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(total_from_row).collect())
    }

    /// Point totals for the members of one league.
    pub async fn query_league_totals(
        &self,
        league_id: LeagueId,
        gameweek: Option<i64>,
    ) -> Result<Vec<UserTotal>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id,
                   u.username AS username,
                   COALESCE(SUM(
                       CASE WHEN f.status = 'finished' AND (?2 IS NULL OR f.gameweek = ?2)
                            THEN p.points ELSE 0 END
                   ), 0) AS total_points
            FROM league_members m
            JOIN users u ON u.id = m.user_id
            LEFT JOIN predictions p ON p.user_id = u.id
            LEFT JOIN fixtures f ON f.id = p.fixture_id
            WHERE m.league_id = ?1
            GROUP BY u.id, u.username
            "#,
        )
        .bind(league_id.as_i64())
        .bind(gameweek)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(total_from_row).collect())
    }
}

fn total_from_row(row: &SqliteRow) -> UserTotal {
    UserTotal {
        user_id: UserId(row.get("user_id")),
        username: row.get("username"),
        total_points: row.get("total_points"),
    }
}
