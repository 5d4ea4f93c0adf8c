//! Database module for SQLite persistence.
//!
//! SQLite holds users and their found-item records. The catalog is not stored here.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::warn!("Could not create database directory {:?}: {}", parent, e);
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL DEFAULT '',
            email TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One row per (user, scope key, item). Scope key is `season-N` or `all-time`.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS found_items (
            user_id TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            item_id INTEGER NOT NULL,
            points INTEGER NOT NULL,
            found_at TEXT NOT NULL,
            PRIMARY KEY (user_id, scope_key, item_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_found_items_scope ON found_items(scope_key, user_id);
        CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
