//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `fixtures.rs` - Fixture records and status transitions
//! - `predictions.rs` - Prediction upserts and engine-owned points
//! - `standings.rs` - Leaderboard aggregation queries
//! - `leagues.rs` - Private leagues and memberships
//! - `reminders.rs` - Deadline reminder bookkeeping

mod fixtures;
mod leagues;
mod predictions;
mod reminders;
mod standings;

pub use fixtures::{FixtureFilter, MalformedFixture};
pub use leagues::LeagueSummary;
pub use predictions::DoubleHolder;
pub use reminders::PendingFixture;

use crate::domain::{NewUser, TimeMs, User, UserId};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Start a transaction on the underlying pool.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    /// Insert a user.
    ///
    /// # Errors
    /// Returns a database error on failure, including a unique violation when
    /// the username is taken.
    pub async fn insert_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(TimeMs::now().as_ms())
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: UserId(result.last_insert_rowid()),
            username: user.username.clone(),
            email: user.email.clone(),
        })
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT id, username, email FROM users WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// All users ordered by id.
    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, username, email FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: UserId(row.get("id")),
        username: row.get("username"),
        email: row.get("email"),
    }
}

/// Whether a database error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get_user() {
        let (repo, _temp) = setup_test_db().await;
        let ann = user(&repo, "ann").await;

        let fetched = repo.get_user(ann.id).await.unwrap().unwrap();
        assert_eq!(fetched, ann);
        assert!(repo.get_user(UserId(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (repo, _temp) = setup_test_db().await;
        user(&repo, "ann").await;

        let err = repo
            .insert_user(&NewUser::new("ann", "other@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_list_users_in_id_order() {
        let (repo, _temp) = setup_test_db().await;
        user(&repo, "zed").await;
        user(&repo, "amy").await;

        let users = repo.list_users().await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }
}
