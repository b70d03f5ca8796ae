//! Clan member war statistics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One clan member's war statistics, as normalized from the API payload.
///
/// Numeric fields are `None` when the upstream value was missing or could not
/// be coerced to a finite number. A `Some` value is always finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// Opaque player identifier
    #[serde(rename = "playerID")]
    pub player_id: Option<String>,

    /// Display name
    pub player_name: Option<String>,

    /// Town hall level
    pub town_hall: Option<f64>,

    /// Cumulative attacks executed
    pub cum_attacks_used: Option<f64>,

    /// Cumulative attacks available
    pub cum_attacks_possible: Option<f64>,

    /// Destruction percentage points summed across attacks
    pub cum_destruction_pct: Option<f64>,

    /// ISO-8601 timestamp of the last upstream refresh
    pub last_updated: Option<String>,

    /// max(0, possible - used)
    pub attacks_left: Option<f64>,

    /// Destruction per attack (0..100 for valid data)
    pub avg_destruction: Option<f64>,

    /// used / possible * 100
    pub completion_pct: Option<f64>,

    /// Composite score, set by the ranking phase
    pub recommendation_score: Option<f64>,

    /// 1-based rank by score, set by the ranking phase
    pub recommendation_rank: Option<u32>,

    /// Any other fields the API returned, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire names of the fields the normalizer understands.
pub const PLAYER_ID: &str = "playerID";
pub const PLAYER_NAME: &str = "playerName";
pub const TOWN_HALL: &str = "townHall";
pub const CUM_ATTACKS_USED: &str = "cumAttacksUsed";
pub const CUM_ATTACKS_POSSIBLE: &str = "cumAttacksPossible";
pub const CUM_DESTRUCTION_PCT: &str = "cumDestructionPct";
pub const LAST_UPDATED: &str = "lastUpdated";

/// Severity of the attacks-left count. Zero left means every attack was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttacksLeftBadge {
    Good,
    Warn,
    Bad,
}

impl AttacksLeftBadge {
    pub fn for_count(attacks_left: f64) -> Self {
        if attacks_left == 0.0 {
            AttacksLeftBadge::Good
        } else if attacks_left == 1.0 {
            AttacksLeftBadge::Warn
        } else {
            AttacksLeftBadge::Bad
        }
    }
}

impl std::fmt::Display for AttacksLeftBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttacksLeftBadge::Good => write!(f, "good"),
            AttacksLeftBadge::Warn => write!(f, "warn"),
            AttacksLeftBadge::Bad => write!(f, "bad"),
        }
    }
}

impl MemberRecord {
    /// Badge for the attacks-left column, if the count is known.
    pub fn attacks_left_badge(&self) -> Option<AttacksLeftBadge> {
        self.attacks_left.map(AttacksLeftBadge::for_count)
    }
}
