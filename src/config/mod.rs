//! Configuration module for the Grail backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::AppError;

/// First day of season 1 unless `GRAIL_SEASON_START` says otherwise.
pub const DEFAULT_SEASON_START: &str = "2025-12-01";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to the static item catalog (JSON array)
    pub catalog_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Epoch that season numbering counts from
    pub season_start: DateTime<Utc>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("GRAIL_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("GRAIL_DB_PATH")
            .unwrap_or_else(|_| "./data/grail.sqlite".to_string())
            .into();

        let catalog_path = env::var("GRAIL_CATALOG_PATH")
            .unwrap_or_else(|_| "./data/items.json".to_string())
            .into();

        let bind_addr = env::var("GRAIL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid GRAIL_BIND_ADDR: {}", e)))?;

        let log_level = env::var("GRAIL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let season_start = parse_season_start(
            &env::var("GRAIL_SEASON_START").unwrap_or_else(|_| DEFAULT_SEASON_START.to_string()),
        )?;

        Ok(Self {
            api_psk,
            db_path,
            catalog_path,
            bind_addr,
            log_level,
            season_start,
        })
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_season_start(value: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid GRAIL_SEASON_START '{}', expected YYYY-MM-DD",
                value
            ))
        })
}
