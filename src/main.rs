//! Grail Tracker Backend
//!
//! REST backend for tracking found items and ranking players on seasonal and
//! all-time leaderboards, with SQLite persistence and a static item catalog.

mod api;
mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod models;
mod season;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::Catalog;
use config::Config;
use db::Repository;
use season::SeasonClock;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub catalog: Arc<Catalog>,
    pub clock: SeasonClock,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Grail Tracker Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Catalog path: {:?}", config.catalog_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (GRAIL_API_PSK). Authentication is disabled!");
    }

    // Load the static item catalog
    let catalog = Catalog::load(&config.catalog_path)?;
    if catalog.is_empty() {
        tracing::warn!("Item catalog is empty");
    }
    tracing::info!(
        "Catalog loaded with {} items worth {} points",
        catalog.len(),
        catalog.max_points()
    );

    let clock = SeasonClock::new(config.season_start);
    tracing::info!(
        "Season epoch {}, current season {}",
        clock.start().to_rfc3339(),
        clock.current_season_id()
    );

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let state = AppState {
        repo,
        catalog: Arc::new(catalog),
        clock,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();
    let clock = state.clock;

    let api_routes = Router::new()
        // Season
        .route("/season", get(api::get_season))
        // Catalog
        .route("/items", get(api::list_items))
        .route("/items/suggestions", get(api::item_suggestions))
        .route("/items/{id}", get(api::get_item))
        // Users
        .route("/users", post(api::sign_in))
        .route("/users/{id}", get(api::get_user))
        .route("/users/{id}/progress", get(api::get_progress))
        // Found items
        .route("/users/{id}/found", get(api::list_found))
        .route("/users/{id}/found", post(api::add_found))
        .route("/users/{id}/found/{item_id}", delete(api::remove_found))
        // Leaderboard
        .route("/leaderboard", get(api::get_leaderboard))
        .layer(middleware::from_fn(move |req, next| {
            auth::require_api_key(psk.clone(), clock, req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
