//! REST API module.
//!
//! Every response carries the season id it was computed under, so the
//! front-end can label season views without its own clock math.

mod extract;
mod found;
mod items;
mod leaderboard;
mod season;
mod users;

pub use found::*;
pub use items::*;
pub use leaderboard::*;
pub use season::*;
pub use users::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorInSeason};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub season_id: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, season_id: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            season_id: season_id.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorInSeason>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, season_id: &str) -> ApiResult<T> {
    Ok(ApiResponse::new(data, season_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, season_id: &str) -> ApiResult<T> {
    Err(err.in_season(season_id))
}
