//! Sound categories
//!
//! Every catalog entry carries exactly one category. Bulk operations select
//! sounds by category instead of by name.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of sound categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCategory {
    // Ambiance zones
    Jungle,
    Plantation,
    Cave,
    Senzala,
    Dungeon,
    MastersHouse,
    SlaveShip,
    HeavenwardTides,
    None,

    // Everything else
    Object,
    Player,
    Baby,
    Rain,
    Music,
}

impl fmt::Display for AudioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioCategory::Jungle => "Jungle",
            AudioCategory::Plantation => "Plantation",
            AudioCategory::Cave => "Cave",
            AudioCategory::Senzala => "Senzala",
            AudioCategory::Dungeon => "Dungeon",
            AudioCategory::MastersHouse => "Master's House",
            AudioCategory::SlaveShip => "Slave Ship",
            AudioCategory::HeavenwardTides => "Heavenward Tides",
            AudioCategory::None => "None",
            AudioCategory::Object => "Object",
            AudioCategory::Player => "Player",
            AudioCategory::Baby => "Baby",
            AudioCategory::Rain => "Rain",
            AudioCategory::Music => "Music",
        };
        f.write_str(name)
    }
}

impl AudioCategory {
    /// Check if this category belongs to a location ambiance bed
    pub fn is_zone_ambiance(&self) -> bool {
        match self {
            AudioCategory::Jungle
            | AudioCategory::Plantation
            | AudioCategory::Cave
            | AudioCategory::Senzala
            | AudioCategory::Dungeon
            | AudioCategory::MastersHouse
            | AudioCategory::SlaveShip
            | AudioCategory::HeavenwardTides => true,
            AudioCategory::None
            | AudioCategory::Object
            | AudioCategory::Player
            | AudioCategory::Baby
            | AudioCategory::Rain
            | AudioCategory::Music => false,
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self, AudioCategory::Music)
    }
}

/// Selects which loaded sounds a bulk operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every loaded sound
    All,

    /// Sounds of exactly this category
    Only(AudioCategory),

    /// Sounds of any category except this one
    Except(AudioCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: AudioCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
            CategoryFilter::Except(excluded) => *excluded != category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all sounds"),
            CategoryFilter::Only(category) => write!(f, "{} sounds", category),
            CategoryFilter::Except(category) => write!(f, "non-{} sounds", category),
        }
    }
}
