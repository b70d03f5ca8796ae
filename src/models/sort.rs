//! Sort keys and directions for the results table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::member::{
    CUM_ATTACKS_POSSIBLE, CUM_ATTACKS_USED, CUM_DESTRUCTION_PCT, LAST_UPDATED, PLAYER_ID,
    PLAYER_NAME, TOWN_HALL,
};

/// A record field to sort by, named by its wire name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    PlayerId,
    PlayerName,
    TownHall,
    CumAttacksUsed,
    CumAttacksPossible,
    CumDestructionPct,
    LastUpdated,
    AttacksLeft,
    AvgDestruction,
    CompletionPct,
    #[default]
    RecommendationScore,
    RecommendationRank,
    /// A field preserved from the payload that the normalizer does not know
    Other(String),
}

impl SortKey {
    /// Wire name of the field.
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::PlayerId => PLAYER_ID,
            SortKey::PlayerName => PLAYER_NAME,
            SortKey::TownHall => TOWN_HALL,
            SortKey::CumAttacksUsed => CUM_ATTACKS_USED,
            SortKey::CumAttacksPossible => CUM_ATTACKS_POSSIBLE,
            SortKey::CumDestructionPct => CUM_DESTRUCTION_PCT,
            SortKey::LastUpdated => LAST_UPDATED,
            SortKey::AttacksLeft => "attacksLeft",
            SortKey::AvgDestruction => "avgDestruction",
            SortKey::CompletionPct => "completionPct",
            SortKey::RecommendationScore => "recommendationScore",
            SortKey::RecommendationRank => "recommendationRank",
            SortKey::Other(name) => name,
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            PLAYER_ID => SortKey::PlayerId,
            PLAYER_NAME => SortKey::PlayerName,
            TOWN_HALL => SortKey::TownHall,
            CUM_ATTACKS_USED => SortKey::CumAttacksUsed,
            CUM_ATTACKS_POSSIBLE => SortKey::CumAttacksPossible,
            CUM_DESTRUCTION_PCT => SortKey::CumDestructionPct,
            LAST_UPDATED => SortKey::LastUpdated,
            "attacksLeft" => SortKey::AttacksLeft,
            "avgDestruction" => SortKey::AvgDestruction,
            "completionPct" => SortKey::CompletionPct,
            "recommendationScore" => SortKey::RecommendationScore,
            "recommendationRank" => SortKey::RecommendationRank,
            other => SortKey::Other(other.to_string()),
        };
        Ok(key)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Next state after a column header is clicked: the same key while
    /// descending flips to ascending, anything else sorts the key descending.
    pub fn next_for(&self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Desc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { key, direction }
    }
}
