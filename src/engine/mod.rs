//! Pure computation for points and rankings.

pub mod leaderboard;
pub mod scoring;

pub use leaderboard::{rank_totals, LeaderboardEntry, UserTotal};
pub use scoring::{points_for, MalformedRow, ScoringInput, ScoringRow};
