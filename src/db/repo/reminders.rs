//! Deadline reminder bookkeeping.

use super::Repository;
use crate::domain::{FixtureId, TimeMs, UserId};
use sqlx::Row;

/// An upcoming fixture a user has not predicted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFixture {
    pub fixture_id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub gameweek: i64,
    pub deadline: TimeMs,
}

impl Repository {
    /// Upcoming fixtures with a deadline in `(after, until]` that the user has
    /// neither predicted nor been reminded about.
    pub async fn query_pending_fixtures(
        &self,
        user_id: UserId,
        after: TimeMs,
        until: TimeMs,
    ) -> Result<Vec<PendingFixture>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.home_team, f.away_team, f.gameweek, f.deadline_ms
            FROM fixtures f
            WHERE f.status = 'upcoming'
              AND f.deadline_ms > ?2
              AND f.deadline_ms <= ?3
              AND NOT EXISTS (
                  SELECT 1 FROM predictions p WHERE p.fixture_id = f.id AND p.user_id = ?1
              )
              AND NOT EXISTS (
                  SELECT 1 FROM reminders_sent r WHERE r.fixture_id = f.id AND r.user_id = ?1
              )
            ORDER BY f.deadline_ms ASC, f.id ASC
            "#,
        )
        .bind(user_id.as_i64())
        .bind(after.as_ms())
        .bind(until.as_ms())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| PendingFixture {
                fixture_id: FixtureId(r.get("id")),
                home_team: r.get("home_team"),
                away_team: r.get("away_team"),
                gameweek: r.get("gameweek"),
                deadline: TimeMs::new(r.get("deadline_ms")),
            })
            .collect())
    }

    /// Mark fixtures as reminded for a user.
    pub async fn record_reminders(
        &self,
        user_id: UserId,
        fixtures: &[FixtureId],
        sent_at: TimeMs,
    ) -> Result<(), sqlx::Error> {
        if fixtures.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for fixture_id in fixtures {
            sqlx::query(
                r#"
                INSERT INTO reminders_sent (user_id, fixture_id, sent_at)
                VALUES (?, ?, ?)
                ON CONFLICT(user_id, fixture_id) DO NOTHING
                "#,
            )
            .bind(user_id.as_i64())
            .bind(fixture_id.as_i64())
            .bind(sent_at.as_ms())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
