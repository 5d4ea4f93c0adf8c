//! Database repository for users, found items and leaderboards.
//!
//! Scope-aware operations take the season id from the caller so the store
//! itself never reads the clock for season math.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    rank_entries, FoundItem, FoundItemsSummary, Item, LeaderboardEntry, Scope, SignInRequest,
    User, ALL_TIME_KEY, ANONYMOUS,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// List all users in sign-up order.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            "SELECT id, display_name, email, created_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, display_name, email, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user or fail with `NotFound`.
    pub async fn require_user(&self, id: &str) -> Result<User, AppError> {
        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Record a sign-in. Creates the user on first sight and fills in a
    /// missing display name later; otherwise the stored user is left alone.
    ///
    /// Both writes are single conditional statements, so concurrent sign-ins
    /// for the same id from several tabs settle on one row.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<User, AppError> {
        let offered_name = request
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS);

        let created = sqlx::query(
            "INSERT INTO users (id, display_name, email, created_at) VALUES (?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(&request.user_id)
        .bind(offered_name)
        .bind(&request.email)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if created.rows_affected() > 0 {
            tracing::info!("Created user {}", request.user_id);
        } else {
            sqlx::query("UPDATE users SET display_name = ? WHERE id = ? AND TRIM(display_name) = ''")
                .bind(offered_name)
                .bind(&request.user_id)
                .execute(&self.pool)
                .await?;
        }

        self.require_user(&request.user_id).await
    }

    // ==================== FOUND-ITEM OPERATIONS ====================

    /// Mark an item as found.
    ///
    /// A season write is mirrored into all-time; both rows commit together.
    /// Writing an existing key replaces the record.
    pub async fn add_found_item(
        &self,
        user_id: &str,
        item: &Item,
        scope: Scope,
        season_id: &str,
    ) -> Result<FoundItem, AppError> {
        let record = FoundItem {
            item_id: item.id,
            points: item.points,
            found_at: Utc::now().to_rfc3339(),
        };

        let mut keys = vec![scope.key(season_id)];
        if scope == Scope::Season {
            keys.push(ALL_TIME_KEY);
        }

        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query(
                "INSERT OR REPLACE INTO found_items (user_id, scope_key, item_id, points, found_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(key)
            .bind(record.item_id)
            .bind(record.points)
            .bind(&record.found_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(record)
    }

    /// Unmark an item in the requested scope only.
    ///
    /// Removing from all-time leaves season records in place, and removing
    /// from a season leaves the all-time record. Returns whether a record existed.
    pub async fn remove_found_item(
        &self,
        user_id: &str,
        item_id: i64,
        scope: Scope,
        season_id: &str,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM found_items WHERE user_id = ? AND scope_key = ? AND item_id = ?")
                .bind(user_id)
                .bind(scope.key(season_id))
                .bind(item_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All records of one user within a scope key.
    pub async fn found_records(
        &self,
        user_id: &str,
        scope_key: &str,
    ) -> Result<Vec<FoundItem>, AppError> {
        let rows = sqlx::query(
            "SELECT item_id, points, found_at FROM found_items WHERE user_id = ? AND scope_key = ? ORDER BY found_at, item_id",
        )
        .bind(user_id)
        .bind(scope_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(found_item_from_row).collect())
    }

    /// Ids and points total of everything a user found in a scope.
    pub async fn list_found_items(
        &self,
        user_id: &str,
        scope: Scope,
        season_id: &str,
    ) -> Result<FoundItemsSummary, AppError> {
        let records = self.found_records(user_id, scope.key(season_id)).await?;
        Ok(FoundItemsSummary::from_records(&records))
    }

    // ==================== LEADERBOARD ====================

    /// Rank every user with at least one record in the scope.
    ///
    /// Walks the user list and reads each user's records, so the cost grows
    /// with users times items. Nothing is cached.
    pub async fn leaderboard(
        &self,
        scope: Scope,
        season_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let scope_key = scope.key(season_id);
        let users = self.list_users().await?;

        let mut entries = Vec::new();
        for user in users {
            let records = self.found_records(&user.user_id, scope_key).await?;
            if records.is_empty() {
                continue;
            }

            let summary = FoundItemsSummary::from_records(&records);
            entries.push(LeaderboardEntry {
                display_name: user.public_name(),
                user_id: user.user_id,
                total_points: summary.total_points,
                item_count: records.len() as i64,
            });
        }

        rank_entries(&mut entries);
        Ok(entries)
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let display_name: String = row.get("display_name");
    let email: Option<String> = row.get("email");
    User {
        user_id: row.get("id"),
        display_name,
        email,
        created_at: row.get("created_at"),
    }
}

fn found_item_from_row(row: &sqlx::sqlite::SqliteRow) -> FoundItem {
    FoundItem {
        item_id: row.get("item_id"),
        points: row.get("points"),
        found_at: row.get("found_at"),
    }
}
