//! PSK-based API guard.
//!
//! Player identity comes from the front-end's identity provider; this layer
//! only keeps unknown clients off the API. Keys are compared in constant time.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::season::SeasonClock;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests that do not present the configured key.
///
/// With no key configured every request passes (dev mode).
pub async fn require_api_key(
    expected_psk: Option<String>,
    clock: SeasonClock,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let rejection = match presented_key(request.headers()) {
        Some(key) if keys_match(key, &expected) => None,
        Some(_) => Some("Invalid API key"),
        None => Some("Missing API key"),
    };

    match rejection {
        None => next.run(request).await,
        Some(message) => reject(message, &clock),
    }
}

/// The key from `x-api-key`, falling back to an `Authorization: Bearer` token.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
}

fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn reject(message: &str, clock: &SeasonClock) -> Response {
    tracing::debug!("Rejected API request: {}", message);
    AppError::Unauthorized(message.to_string())
        .in_season(clock.current_season_id())
        .into_response()
}
