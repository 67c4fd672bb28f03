//! Prediction operations and engine-owned point writes.

use super::Repository;
use crate::domain::{
    Fixture, FixtureId, Prediction, PredictionId, Scoreline, TimeMs, UserId,
};
use crate::engine::ScoringRow;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

/// An existing doubled prediction and the deadline that freezes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleHolder {
    pub prediction_id: PredictionId,
    pub fixture_id: FixtureId,
    pub deadline: TimeMs,
}

impl Repository {
    /// Insert or update the caller's prediction for a fixture.
    ///
    /// When `is_double` is set, any other double held by the user in the
    /// fixture's gameweek is cleared in the same transaction.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn upsert_prediction(
        &self,
        user_id: UserId,
        fixture: &Fixture,
        pick: Scoreline,
        is_double: bool,
    ) -> Result<Prediction, sqlx::Error> {
        let now = TimeMs::now().as_ms();
        let mut tx = self.pool.begin().await?;

        if is_double {
            sqlx::query(
                r#"
                UPDATE predictions
                SET is_double = 0, updated_at = ?
                WHERE user_id = ?
                  AND is_double = 1
                  AND fixture_id != ?
                  AND fixture_id IN (SELECT id FROM fixtures WHERE gameweek = ?)
                "#,
            )
            .bind(now)
            .bind(user_id.as_i64())
            .bind(fixture.id.as_i64())
            .bind(fixture.gameweek)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO predictions (
                user_id, fixture_id, home_score, away_score, is_double, points,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            ON CONFLICT(user_id, fixture_id) DO UPDATE SET
                home_score = excluded.home_score,
                away_score = excluded.away_score,
                is_double = excluded.is_double,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(fixture.id.as_i64())
        .bind(pick.home as i64)
        .bind(pick.away as i64)
        .bind(is_double)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT id, user_id, fixture_id, home_score, away_score, is_double, points
            FROM predictions
            WHERE user_id = ? AND fixture_id = ?
            "#,
        )
        .bind(user_id.as_i64())
        .bind(fixture.id.as_i64())
        .fetch_one(&mut *tx)
        .await?;
        let prediction = prediction_from_row(&row)?;

        tx.commit().await?;
        Ok(prediction)
    }

    /// Get a prediction by id.
    pub async fn get_prediction(&self, id: PredictionId) -> Result<Option<Prediction>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, fixture_id, home_score, away_score, is_double, points
            FROM predictions
            WHERE id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(prediction_from_row).transpose()
    }

    /// A user's predictions, optionally restricted to one gameweek.
    pub async fn list_user_predictions(
        &self,
        user_id: UserId,
        gameweek: Option<i64>,
    ) -> Result<Vec<Prediction>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.user_id, p.fixture_id, p.home_score, p.away_score, p.is_double, p.points
            FROM predictions p
            JOIN fixtures f ON f.id = p.fixture_id
            WHERE p.user_id = ?1 AND (?2 IS NULL OR f.gameweek = ?2)
            ORDER BY f.kickoff_ms ASC, p.id ASC
            "#,
        )
        .bind(user_id.as_i64())
        .bind(gameweek)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(prediction_from_row).collect()
    }

    /// The user's doubled prediction in a gameweek other than on `except`.
    pub async fn find_double_in_gameweek(
        &self,
        user_id: UserId,
        gameweek: i64,
        except: FixtureId,
    ) -> Result<Option<DoubleHolder>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.fixture_id, f.deadline_ms
            FROM predictions p
            JOIN fixtures f ON f.id = p.fixture_id
            WHERE p.user_id = ? AND p.is_double = 1 AND f.gameweek = ? AND p.fixture_id != ?
            ORDER BY p.id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(gameweek)
        .bind(except.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DoubleHolder {
            prediction_id: PredictionId(r.get("id")),
            fixture_id: FixtureId(r.get("fixture_id")),
            deadline: TimeMs::new(r.get("deadline_ms")),
        }))
    }

    /// Delete a prediction. Returns whether a row was removed.
    pub async fn delete_prediction(&self, id: PredictionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM predictions WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Scoring engine access
    // =========================================================================

    /// Ids of predictions on finished fixtures with both scores set.
    ///
    /// Restricted to one fixture when `fixture` is given.
    pub async fn query_scoreable_prediction_ids(
        &self,
        fixture: Option<FixtureId>,
    ) -> Result<Vec<PredictionId>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT p.id
            FROM predictions p
            JOIN fixtures f ON f.id = p.fixture_id
            WHERE f.status = 'finished'
              AND f.home_score IS NOT NULL
              AND f.away_score IS NOT NULL
              AND (?1 IS NULL OR f.id = ?1)
            ORDER BY p.id ASC
            "#,
        )
        .bind(fixture.map(|f| f.as_i64()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| PredictionId(r.get("id"))).collect())
    }

    /// Load the scoring columns for one prediction on an open connection.
    pub async fn fetch_scoring_row(
        conn: &mut SqliteConnection,
        id: PredictionId,
    ) -> Result<Option<ScoringRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.home_score, p.away_score, p.is_double,
                   f.status, f.home_score AS fixture_home, f.away_score AS fixture_away
            FROM predictions p
            JOIN fixtures f ON f.id = p.fixture_id
            WHERE p.id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;

        row.map(|r| {
            Ok(ScoringRow {
                prediction_id: r.try_get("id")?,
                fixture_status: r.try_get("status")?,
                fixture_home_score: r.try_get("fixture_home")?,
                fixture_away_score: r.try_get("fixture_away")?,
                predicted_home: r.try_get("home_score")?,
                predicted_away: r.try_get("away_score")?,
                is_double: r.try_get("is_double")?,
            })
        })
        .transpose()
    }

    /// Persist engine-computed points for one prediction.
    pub async fn write_points(
        conn: &mut SqliteConnection,
        id: PredictionId,
        points: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE predictions SET points = ? WHERE id = ?")
            .bind(points)
            .bind(id.as_i64())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

fn prediction_from_row(row: &SqliteRow) -> Result<Prediction, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let pick = Scoreline::new(row.try_get("home_score")?, row.try_get("away_score")?)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Prediction {
        id: PredictionId(id),
        user_id: UserId(row.try_get("user_id")?),
        fixture_id: FixtureId(row.try_get("fixture_id")?),
        pick,
        is_double: row.try_get("is_double")?,
        points: row.try_get("points")?,
    })
}
