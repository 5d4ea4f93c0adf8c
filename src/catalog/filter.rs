//! Catalog filter state and its query-string form.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Item, ItemType, Scope, SubType};

/// Which side of the found/not-found partition to show.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    NotFound,
    Found,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    PointsHigh,
    PointsLow,
    NameAsc,
    NameDesc,
}

impl SortBy {
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortBy::PointsHigh => b.points.cmp(&a.points),
            SortBy::PointsLow => a.points.cmp(&b.points),
            SortBy::NameAsc => compare_names(&a.item_name, &b.item_name),
            SortBy::NameDesc => compare_names(&b.item_name, &a.item_name),
        }
    }
}

/// Case-insensitive first, then by raw text so distinct names never tie.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Everything the item list is narrowed and ordered by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub view: View,
    pub search: String,
    pub types: Vec<ItemType>,
    pub sub_types: Vec<SubType>,
    pub sort: SortBy,
}

impl ItemFilter {
    /// True when `item` survives the search term and type selections.
    pub fn matches(&self, item: &Item) -> bool {
        let search = self.search.to_lowercase();
        if !search.is_empty() && !item.item_name.to_lowercase().contains(&search) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&item.item_type) {
            return false;
        }
        if !self.sub_types.is_empty() && !self.sub_types.contains(&item.sub_type) {
            return false;
        }
        true
    }
}

/// Query parameters of `GET /api/items`.
///
/// `types` and `subTypes` are comma-separated lists, e.g. `types=Rune,SetItem`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub sub_types: Option<String>,
    #[serde(default)]
    pub sort: SortBy,
    /// Whose found items drive the view partition. Without it nothing counts as found.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub scope: Scope,
}

impl ItemQuery {
    pub fn to_filter(&self) -> Result<ItemFilter, AppError> {
        Ok(ItemFilter {
            view: self.view,
            search: self.search.clone().unwrap_or_default(),
            types: parse_list(self.types.as_deref())?,
            sub_types: parse_list(self.sub_types.as_deref())?,
            sort: self.sort,
        })
    }
}

fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>, AppError>
where
    T: FromStr<Err = String> + PartialEq,
{
    let mut values = Vec::new();
    for part in raw.unwrap_or_default().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value = part.parse::<T>().map_err(AppError::Validation)?;
        if !values.contains(&value) {
            values.push(value);
        }
    }
    Ok(values)
}
