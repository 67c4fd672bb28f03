//! Leaderboard ranking over aggregated user totals.

use crate::domain::UserId;
use serde::Serialize;

/// Aggregated points for one user, before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTotal {
    pub user_id: UserId,
    pub username: String,
    pub total_points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: UserId,
    pub username: String,
    pub total_points: i64,
}

/// Order totals and assign ranks.
///
/// Sorted by total descending, then username ascending, then user id. Ranks
/// are consecutive row positions starting at 1; tied totals do not share a rank.
pub fn rank_totals(mut totals: Vec<UserTotal>) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    totals
        .into_iter()
        .enumerate()
        .map(|(idx, t)| LeaderboardEntry {
            rank: (idx + 1) as i64,
            user_id: t.user_id,
            username: t.username,
            total_points: t.total_points,
        })
        .collect()
}
