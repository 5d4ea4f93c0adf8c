//! Catalog item model matching the static items file.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Item category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemType {
    Rune,
    SetItem,
    UniqueItem,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Rune, ItemType::SetItem, ItemType::UniqueItem];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Rune => "Rune",
            ItemType::SetItem => "SetItem",
            ItemType::UniqueItem => "UniqueItem",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown item type '{}'", s))
    }
}

/// Equipment slot, `None` for runes and slotless items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SubType {
    None,
    Helmet,
    Chest,
    Gloves,
    Belt,
    Boots,
    Shield,
    Weapon,
    Amulet,
    Ring,
    Jewel,
    Charm,
}

impl SubType {
    pub const ALL: [SubType; 12] = [
        SubType::None,
        SubType::Helmet,
        SubType::Chest,
        SubType::Gloves,
        SubType::Belt,
        SubType::Boots,
        SubType::Shield,
        SubType::Weapon,
        SubType::Amulet,
        SubType::Ring,
        SubType::Jewel,
        SubType::Charm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubType::None => "None",
            SubType::Helmet => "Helmet",
            SubType::Chest => "Chest",
            SubType::Gloves => "Gloves",
            SubType::Belt => "Belt",
            SubType::Boots => "Boots",
            SubType::Shield => "Shield",
            SubType::Weapon => "Weapon",
            SubType::Amulet => "Amulet",
            SubType::Ring => "Ring",
            SubType::Jewel => "Jewel",
            SubType::Charm => "Charm",
        }
    }
}

impl FromStr for SubType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown item subtype '{}'", s))
    }
}

/// A collectible item. Field names follow the catalog file verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "ItemName")]
    pub item_name: String,
    #[serde(rename = "ItemType")]
    pub item_type: ItemType,
    #[serde(rename = "SubType")]
    pub sub_type: SubType,
    #[serde(rename = "Points")]
    pub points: i64,
}
