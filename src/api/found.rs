//! Found-item API endpoints.

use axum::extract::State;
use serde::Serialize;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{AddFoundItemRequest, FoundItem, FoundItemsSummary, ScopeQuery};
use crate::AppState;

/// Result of unmarking an item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedFoundItem {
    pub item_id: i64,
    /// False when the item was not marked in this scope.
    pub removed: bool,
}

/// GET /api/users/:id/found - Item ids and point total in a scope.
pub async fn list_found(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<FoundItemsSummary> {
    let season_id = state.clock.current_season_id();

    match state
        .repo
        .list_found_items(&user_id, query.scope, &season_id)
        .await
    {
        Ok(summary) => success(summary, &season_id),
        Err(e) => error(e, &season_id),
    }
}

/// POST /api/users/:id/found - Mark a catalog item as found.
pub async fn add_found(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
    ApiJson(request): ApiJson<AddFoundItemRequest>,
) -> ApiResult<FoundItem> {
    let season_id = state.clock.current_season_id();

    if let Err(e) = state.repo.require_user(&user_id).await {
        return error(e, &season_id);
    }

    // Points always come from the catalog, never from the client.
    let Some(item) = state.catalog.get(request.item_id) else {
        return error(
            AppError::NotFound(format!("Item {} not found", request.item_id)),
            &season_id,
        );
    };

    match state
        .repo
        .add_found_item(&user_id, item, query.scope, &season_id)
        .await
    {
        Ok(record) => {
            tracing::debug!(
                "User {} found item {} ({:?}, {})",
                user_id,
                item.id,
                query.scope,
                season_id
            );
            success(record, &season_id)
        }
        Err(e) => {
            tracing::error!("Error adding found item {} for {}: {}", item.id, user_id, e);
            error(e, &season_id)
        }
    }
}

/// DELETE /api/users/:id/found/:item_id - Unmark an item in one scope.
pub async fn remove_found(
    State(state): State<AppState>,
    ApiPath((user_id, item_id)): ApiPath<(String, i64)>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<RemovedFoundItem> {
    let season_id = state.clock.current_season_id();

    if let Err(e) = state.repo.require_user(&user_id).await {
        return error(e, &season_id);
    }

    match state
        .repo
        .remove_found_item(&user_id, item_id, query.scope, &season_id)
        .await
    {
        Ok(removed) => success(RemovedFoundItem { item_id, removed }, &season_id),
        Err(e) => {
            tracing::error!("Error removing found item {} for {}: {}", item_id, user_id, e);
            error(e, &season_id)
        }
    }
}
