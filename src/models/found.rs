//! Found-item records and scopes.

use serde::{Deserialize, Serialize};

/// Storage key of the all-time scope.
pub const ALL_TIME_KEY: &str = "all-time";

/// Which collection a found-item operation targets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// The current season; writes are mirrored into all-time.
    #[default]
    Season,
    AllTime,
}

impl Scope {
    /// Storage key for this scope given the current season id.
    pub fn key<'a>(&self, season_id: &'a str) -> &'a str {
        match self {
            Scope::Season => season_id,
            Scope::AllTime => ALL_TIME_KEY,
        }
    }
}

/// A user's record of having found a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    pub item_id: i64,
    pub points: i64,
    pub found_at: String,
}

/// Ids and point total of everything found within one scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoundItemsSummary {
    pub item_ids: Vec<i64>,
    pub total_points: i64,
}

impl FoundItemsSummary {
    pub fn from_records(records: &[FoundItem]) -> Self {
        Self {
            item_ids: records.iter().map(|r| r.item_id).collect(),
            total_points: records.iter().map(|r| r.points).sum(),
        }
    }
}

/// Query string selecting a scope, e.g. `?scope=all-time`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: Scope,
}

/// Request body for marking an item as found.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFoundItemRequest {
    pub item_id: i64,
}

/// Completion progress of a user against the whole catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_points: i64,
    pub max_points: i64,
    pub found_items: usize,
    pub max_items: usize,
    pub percentage: i64,
}
