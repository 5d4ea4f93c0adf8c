//! User API endpoints.

use axum::extract::State;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Progress, ScopeQuery, SignInRequest, User};
use crate::AppState;

/// POST /api/users - Record a sign-in from the identity provider.
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> ApiResult<User> {
    let season_id = state.clock.current_season_id();

    if request.user_id.trim().is_empty() {
        return error(
            AppError::Validation("User ID is required".to_string()),
            &season_id,
        );
    }

    match state.repo.sign_in(&request).await {
        Ok(user) => success(user, &season_id),
        Err(e) => error(e, &season_id),
    }
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResult<User> {
    let season_id = state.clock.current_season_id();

    match state.repo.require_user(&id).await {
        Ok(user) => success(user, &season_id),
        Err(e) => error(e, &season_id),
    }
}

/// GET /api/users/:id/progress - Completion of the catalog within a scope.
pub async fn get_progress(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<Progress> {
    let season_id = state.clock.current_season_id();

    let summary = match state
        .repo
        .list_found_items(&id, query.scope, &season_id)
        .await
    {
        Ok(summary) => summary,
        Err(e) => return error(e, &season_id),
    };

    success(
        state
            .catalog
            .progress(summary.item_ids.len(), summary.total_points),
        &season_id,
    )
}
