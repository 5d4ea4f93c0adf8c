//! Leaderboard models. Nothing here is stored; entries are derived per request.

use serde::{Deserialize, Serialize};

use super::Scope;

/// One ranked user within a scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: String,
    pub total_points: i64,
    pub item_count: i64,
}

/// Sort entries by points, highest first. Ties keep their input order.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
}

/// A user's placement outside the top of the board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub entry: LeaderboardEntry,
}

/// Leaderboard view returned by `GET /api/leaderboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub scope: Scope,
    pub title: String,
    pub total: usize,
    pub entries: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<RankedEntry>,
}

impl LeaderboardView {
    /// Cut a ranked board down to its top `limit` entries, keeping the
    /// requesting user's placement when it falls below the cut.
    pub fn build(
        scope: Scope,
        season_id: &str,
        ranked: Vec<LeaderboardEntry>,
        limit: usize,
        user_id: Option<&str>,
    ) -> Self {
        let title = match scope {
            Scope::Season => format!("{} HIGHSCORE", season_id.to_uppercase()),
            Scope::AllTime => "ALL-TIME HIGHSCORE".to_string(),
        };

        let current_user = user_id.and_then(|id| {
            ranked
                .iter()
                .position(|e| e.user_id == id)
                .filter(|index| *index >= limit)
                .map(|index| RankedEntry {
                    rank: index + 1,
                    entry: ranked[index].clone(),
                })
        });

        let total = ranked.len();
        let entries = ranked.into_iter().take(limit).collect();

        Self {
            scope,
            title,
            total,
            entries,
            current_user,
        }
    }
}
