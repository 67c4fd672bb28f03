//! Database migrations and initialization.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

/// Initialize the SQLite database with schema and pragmas.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!(path = %db_path, "Database ready");
    Ok(pool)
}

/// Apply the bundled schema. Every statement is idempotent.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements: Vec<&str> = include_str!("schema.sql")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut tx = pool.begin().await?;
    for statement in &statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(statements = statements.len(), "Schema migrations applied");
    Ok(())
}

/// Configure per-connection SQLite pragmas.
///
/// Foreign keys are enforced so deleting a user or fixture cascades to its
/// predictions, memberships and reminder records.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode reports the mode actually in effect
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    debug!(journal_mode = %journal_mode, "SQLite connection configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TABLES: [&str; 6] = [
        "users",
        "fixtures",
        "predictions",
        "leagues",
        "league_members",
        "reminders_sent",
    ];

    async fn fresh_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("nested")
            .join("matchday.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());
        (pool, temp_dir)
    }

    /// One user `ann` (id 1) and one fixture (id 1).
    async fn seed(pool: &SqlitePool) {
        sqlx::query("INSERT INTO users (username, email, created_at) VALUES ('ann', 'a@x.io', 0)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO fixtures (home_team, away_team, kickoff_ms, deadline_ms, gameweek, created_at, updated_at) \
             VALUES ('A', 'B', 10, 5, 1, 0, 0)",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_schema_reapplies_cleanly() {
        let (pool, _temp) = fresh_pool().await;
        seed(&pool).await;

        run_migrations(&pool)
            .await
            .expect("second migration run failed");

        for table in TABLES {
            let found: Option<(String,)> =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
                    .bind(table)
                    .fetch_optional(&pool)
                    .await
                    .unwrap();
            assert!(found.is_some(), "missing table {}", table);
        }

        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1, "re-running the schema keeps data");
    }

    #[tokio::test]
    async fn test_fixture_defaults_to_upcoming_without_scores() {
        let (pool, _temp) = fresh_pool().await;
        seed(&pool).await;

        let (status, home, away): (String, Option<i64>, Option<i64>) =
            sqlx::query_as("SELECT status, home_score, away_score FROM fixtures WHERE id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "upcoming");
        assert_eq!((home, away), (None, None));
    }

    #[tokio::test]
    async fn test_prediction_pair_is_unique() {
        let (pool, _temp) = fresh_pool().await;
        seed(&pool).await;

        let insert = "INSERT INTO predictions (user_id, fixture_id, home_score, away_score, created_at, updated_at) \
                      VALUES (1, 1, 1, 0, 0, 0)";
        sqlx::query(insert).execute(&pool).await.unwrap();
        assert!(sqlx::query(insert).execute(&pool).await.is_err());
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced_and_cascade() {
        let (pool, _temp) = fresh_pool().await;
        seed(&pool).await;

        let orphan = sqlx::query(
            "INSERT INTO predictions (user_id, fixture_id, home_score, away_score, created_at, updated_at) \
             VALUES (1, 99, 0, 0, 0, 0)",
        )
        .execute(&pool)
        .await;
        assert!(orphan.is_err(), "prediction on a missing fixture");

        sqlx::query(
            "INSERT INTO predictions (user_id, fixture_id, home_score, away_score, created_at, updated_at) \
             VALUES (1, 1, 0, 0, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO reminders_sent (user_id, fixture_id, sent_at) VALUES (1, 1, 0)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM fixtures WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        for table in ["predictions", "reminders_sent"] {
            let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0, "{} rows survived fixture delete", table);
        }
    }
}
