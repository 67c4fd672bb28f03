use crate::db::Repository;
use crate::domain::{FixtureId, FixtureStatus, TimeMs};
use crate::orchestration::recalculate::{RecalculationReport, Recalculator};
use serde::Serialize;
use std::sync::Arc;

/// Brings fixture statuses in line with the clock and recorded scores.
///
/// Runs before every fixture-list read and on a background timer. Calling it
/// repeatedly is harmless: settled fixtures produce no transitions.
#[derive(Clone)]
pub struct Reconciler {
    repo: Arc<Repository>,
    recalculator: Recalculator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub went_live: Vec<FixtureId>,
    pub finished: Vec<FixtureId>,
    /// Stored rows that failed validation and were left untouched.
    pub skipped: Vec<FixtureId>,
    pub recalculation: RecalculationReport,
}

impl Reconciler {
    pub fn new(repo: Arc<Repository>, recalculator: Recalculator) -> Self {
        Self { repo, recalculator }
    }

    pub async fn reconcile(&self) -> Result<ReconcileReport, sqlx::Error> {
        self.reconcile_at(TimeMs::now()).await
    }

    /// Apply status transitions as of `now`.
    ///
    /// Newly finished fixtures have their predictions recalculated.
    pub async fn reconcile_at(&self, now: TimeMs) -> Result<ReconcileReport, sqlx::Error> {
        let mut report = ReconcileReport::default();

        for decoded in self.repo.list_unsettled_fixtures().await? {
            let fixture = match decoded {
                Ok(fixture) => fixture,
                Err(e) => {
                    tracing::warn!(fixture_id = %e.id, reason = %e.reason, "Skipping malformed fixture");
                    report.skipped.push(e.id);
                    continue;
                }
            };
            let Some(next) = fixture.next_status(now) else {
                continue;
            };

            // Lost a race with a concurrent write; the next pass re-reads it.
            if !self
                .repo
                .set_fixture_status(fixture.id, fixture.status, next)
                .await?
            {
                continue;
            }
            tracing::info!(
                fixture_id = %fixture.id,
                from = %fixture.status,
                to = %next,
                "Fixture status changed"
            );

            match next {
                FixtureStatus::Finished => report.finished.push(fixture.id),
                FixtureStatus::Live => report.went_live.push(fixture.id),
                FixtureStatus::Upcoming => {}
            }
        }

        if !report.finished.is_empty() {
            report.recalculation = self
                .recalculator
                .recalculate_fixtures(&report.finished)
                .await?;
        }

        Ok(report)
    }
}
