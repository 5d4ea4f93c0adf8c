//! Season API endpoint.

use axum::extract::State;
use chrono::Utc;

use super::{success, ApiResult};
use crate::season::SeasonInfo;
use crate::AppState;

/// GET /api/season - Current season label and window.
pub async fn get_season(State(state): State<AppState>) -> ApiResult<SeasonInfo> {
    let info = state.clock.info_at(Utc::now());
    let season_id = info.season_id.clone();
    success(info, &season_id)
}
