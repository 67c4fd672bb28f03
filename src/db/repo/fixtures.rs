//! Fixture operations.

use super::Repository;
use crate::domain::{Fixture, FixtureId, FixtureStatus, NewFixture, Scoreline, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use thiserror::Error;

const FIXTURE_COLUMNS: &str = "id, home_team, away_team, kickoff_ms, deadline_ms, \
                               home_score, away_score, gameweek, status";

/// Optional filters for listing fixtures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureFilter {
    pub gameweek: Option<i64>,
    pub status: Option<FixtureStatus>,
}

/// A stored fixture row that violates fixture invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fixture {id} is malformed: {reason}")]
pub struct MalformedFixture {
    pub id: FixtureId,
    pub reason: String,
}

impl Repository {
    /// Insert a new fixture in `upcoming` status.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_fixture(&self, fixture: &NewFixture) -> Result<Fixture, sqlx::Error> {
        let now = TimeMs::now().as_ms();
        let result = sqlx::query(
            r#"
            INSERT INTO fixtures (
                home_team, away_team, kickoff_ms, deadline_ms, gameweek, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, 'upcoming', ?, ?)
            "#,
        )
        .bind(&fixture.home_team)
        .bind(&fixture.away_team)
        .bind(fixture.kickoff.as_ms())
        .bind(fixture.deadline.as_ms())
        .bind(fixture.gameweek)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Fixture {
            id: FixtureId(result.last_insert_rowid()),
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            kickoff: fixture.kickoff,
            deadline: fixture.deadline,
            result: None,
            gameweek: fixture.gameweek,
            status: FixtureStatus::Upcoming,
        })
    }

    /// Get a fixture by id.
    ///
    /// # Errors
    /// Returns a decode error if the stored row violates fixture invariants.
    pub async fn get_fixture(&self, id: FixtureId) -> Result<Option<Fixture>, sqlx::Error> {
        let sql = format!("SELECT {} FROM fixtures WHERE id = ?", FIXTURE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(fixture_from_row).transpose()
    }

    /// List fixtures ordered by kickoff.
    ///
    /// Rows that fail validation are logged and left out.
    pub async fn list_fixtures(&self, filter: FixtureFilter) -> Result<Vec<Fixture>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM fixtures
            WHERE (?1 IS NULL OR gameweek = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY kickoff_ms ASC, id ASC
            "#,
            FIXTURE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(filter.gameweek)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(checked_fixture)
            .filter_map(|decoded| match decoded {
                Ok(fixture) => Some(fixture),
                Err(e) => {
                    tracing::warn!(fixture_id = %e.id, reason = %e.reason, "Skipping malformed fixture");
                    None
                }
            })
            .collect())
    }

    /// Fixtures whose status may still change, decoded row by row.
    pub async fn list_unsettled_fixtures(
        &self,
    ) -> Result<Vec<Result<Fixture, MalformedFixture>>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM fixtures WHERE status != 'finished' ORDER BY kickoff_ms ASC, id ASC",
            FIXTURE_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(checked_fixture).collect())
    }

    /// Move a fixture from `from` to `to`. Returns whether a row changed.
    ///
    /// The write only applies while the stored status is still `from` and the
    /// stored scores agree with `to`: `live` needs no scores, `finished` needs
    /// both.
    pub async fn set_fixture_status(
        &self,
        id: FixtureId,
        from: FixtureStatus,
        to: FixtureStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE fixtures
            SET status = ?1, updated_at = ?2
            WHERE id = ?3
              AND status = ?4
              AND (?1 != 'live' OR (home_score IS NULL AND away_score IS NULL))
              AND (?1 != 'finished' OR (home_score IS NOT NULL AND away_score IS NOT NULL))
            "#,
        )
        .bind(to.as_str())
        .bind(TimeMs::now().as_ms())
        .bind(id.as_i64())
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a final (or corrected) score and mark the fixture finished.
    ///
    /// Returns whether the fixture exists.
    pub async fn set_fixture_result(
        &self,
        id: FixtureId,
        score: Scoreline,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE fixtures
            SET home_score = ?, away_score = ?, status = 'finished', updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(score.home as i64)
        .bind(score.away as i64)
        .bind(TimeMs::now().as_ms())
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn fixture_from_row(row: &SqliteRow) -> Result<Fixture, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Fixture::from_parts(
        FixtureId(row.try_get("id")?),
        row.try_get("home_team")?,
        row.try_get("away_team")?,
        TimeMs::new(row.try_get("kickoff_ms")?),
        TimeMs::new(row.try_get("deadline_ms")?),
        row.try_get("home_score")?,
        row.try_get("away_score")?,
        row.try_get("gameweek")?,
        &status,
    )
    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn checked_fixture(row: &SqliteRow) -> Result<Fixture, MalformedFixture> {
    fixture_from_row(row).map_err(|e| MalformedFixture {
        id: FixtureId(row.try_get("id").unwrap_or_default()),
        reason: e.to_string(),
    })
}
