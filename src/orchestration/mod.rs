//! Services that drive the engine against the store.

pub mod leagues;
pub mod predictions;
pub mod recalculate;
pub mod reconcile;
pub mod reminders;
pub mod schedule;

pub use leagues::{LeagueDirectory, LeagueError};
pub use predictions::{PredictionBook, PredictionError};
pub use recalculate::{PointsOutcome, RecalculationReport, Recalculator, ScoringError};
pub use reconcile::{ReconcileReport, Reconciler};
pub use reminders::{ReminderReport, ReminderRunner};
