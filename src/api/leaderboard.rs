//! Leaderboard API endpoint.

use axum::extract::State;
use serde::Deserialize;

use super::extract::ApiQuery;
use super::{error, success, ApiResult};
use crate::models::{LeaderboardView, Scope};
use crate::AppState;

/// Leaderboard query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub scope: Scope,
    /// Requesting user, reported separately when ranked below the top entries.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Number of top entries (default: 10).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Maximum number of leaderboard entries returned.
const MAX_LEADERBOARD_LIMIT: usize = 100;

/// GET /api/leaderboard - Ranked users for the season or all-time.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LeaderboardQuery>,
) -> ApiResult<LeaderboardView> {
    let season_id = state.clock.current_season_id();
    let limit = params.limit.clamp(1, MAX_LEADERBOARD_LIMIT);

    match state.repo.leaderboard(params.scope, &season_id).await {
        Ok(ranked) => success(
            LeaderboardView::build(
                params.scope,
                &season_id,
                ranked,
                limit,
                params.user_id.as_deref(),
            ),
            &season_id,
        ),
        Err(e) => {
            tracing::error!("Error building {:?} leaderboard: {}", params.scope, e);
            error(e, &season_id)
        }
    }
}
