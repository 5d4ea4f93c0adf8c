//! Static item catalog.
//!
//! Loaded once at startup and never written afterwards. Items are kept sorted
//! by points, highest first, which is also the order suggestions draw from.

mod filter;

pub use filter::*;

use std::collections::HashSet;
use std::path::Path;

use crate::errors::AppError;
use crate::models::{Item, Progress};

/// Minimum query length before name suggestions are offered.
pub const SUGGESTION_MIN_CHARS: usize = 2;
/// Maximum number of name suggestions.
pub const SUGGESTION_LIMIT: usize = 10;

/// The immutable list of collectible items.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    max_points: i64,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(mut items: Vec<Item>) -> Result<Self, AppError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(AppError::Catalog(format!(
                    "Duplicate item id {} in catalog",
                    item.id
                )));
            }
        }

        items.sort_by(|a, b| b.points.cmp(&a.points));
        let max_points = items.iter().map(|i| i.points).sum();

        Ok(Self { items, max_points })
    }

    /// Load the catalog from a JSON array of items.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let items: Vec<Item> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Catalog(format!("Failed to parse catalog {}: {}", path.display(), e))
        })?;
        Self::new(items)
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every item's points.
    pub fn max_points(&self) -> i64 {
        self.max_points
    }

    /// Apply view partition, search, type selections and sort order, in that order.
    pub fn filter(&self, filter: &ItemFilter, found_ids: &[i64]) -> Vec<Item> {
        let found: HashSet<i64> = found_ids.iter().copied().collect();

        let mut selected: Vec<Item> = self
            .items
            .iter()
            .filter(|item| match filter.view {
                View::Found => found.contains(&item.id),
                View::NotFound => !found.contains(&item.id),
            })
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();

        selected.sort_by(|a, b| filter.sort.compare(a, b));
        selected
    }

    /// Name suggestions for a partially typed search.
    pub fn suggestions(&self, prefix: &str) -> Vec<Item> {
        if prefix.chars().count() < SUGGESTION_MIN_CHARS {
            return Vec::new();
        }
        let prefix = prefix.to_lowercase();

        let mut matches: Vec<Item> = self
            .items
            .iter()
            .filter(|item| item.item_name.to_lowercase().starts_with(&prefix))
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect();

        matches.sort_by(|a, b| compare_names(&a.item_name, &b.item_name));
        matches
    }

    /// Completion of the catalog for a found-item summary.
    pub fn progress(&self, found_items: usize, current_points: i64) -> Progress {
        let percentage = if self.max_points > 0 {
            (current_points as f64 / self.max_points as f64 * 100.0).round() as i64
        } else {
            0
        };

        Progress {
            current_points,
            max_points: self.max_points,
            found_items,
            max_items: self.items.len(),
            percentage,
        }
    }
}
