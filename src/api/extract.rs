//! Extractors that report malformed input in the standard error envelope.
//!
//! axum's own `Query`, `Path` and `Json` reject with plain text; these wrap
//! them and turn the rejection into `BAD_REQUEST` stamped with the season.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppErrorInSeason};
use crate::AppState;

fn bad_request(message: String, state: &AppState) -> AppErrorInSeason {
    AppError::BadRequest(message).in_season(state.clock.current_season_id())
}

/// Query string extractor.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T> FromRequestParts<AppState> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorInSeason;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| bad_request(rejection.body_text(), state))
    }
}

/// Path parameter extractor.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<T> FromRequestParts<AppState> for ApiPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorInSeason;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| bad_request(rejection.body_text(), state))
    }
}

/// JSON body extractor.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppErrorInSeason;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| bad_request(rejection.body_text(), state))
    }
}
