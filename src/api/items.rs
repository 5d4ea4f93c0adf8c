//! Catalog API endpoints.

use axum::extract::State;
use serde::Deserialize;

use super::extract::{ApiPath, ApiQuery};
use super::{error, success, ApiResult};
use crate::catalog::ItemQuery;
use crate::errors::AppError;
use crate::models::Item;
use crate::AppState;

/// GET /api/items - Filtered and sorted catalog.
///
/// With a `userId`, the found/not-found view is partitioned by that user's
/// records in `scope`; without one, nothing counts as found.
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ItemQuery>,
) -> ApiResult<Vec<Item>> {
    let season_id = state.clock.current_season_id();

    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(e) => return error(e, &season_id),
    };

    let found_ids = match query.user_id.as_deref() {
        Some(user_id) => match state
            .repo
            .list_found_items(user_id, query.scope, &season_id)
            .await
        {
            Ok(summary) => summary.item_ids,
            Err(e) => return error(e, &season_id),
        },
        None => Vec::new(),
    };

    success(state.catalog.filter(&filter, &found_ids), &season_id)
}

/// GET /api/items/:id - A single catalog item.
pub async fn get_item(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<Item> {
    let season_id = state.clock.current_season_id();

    match state.catalog.get(id) {
        Some(item) => success(item.clone(), &season_id),
        None => error(
            AppError::NotFound(format!("Item {} not found", id)),
            &season_id,
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/items/suggestions - Item names starting with `q`.
pub async fn item_suggestions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SuggestionQuery>,
) -> ApiResult<Vec<Item>> {
    let season_id = state.clock.current_season_id();
    success(state.catalog.suggestions(&params.q), &season_id)
}
