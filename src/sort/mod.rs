//! Column sorting for result sets.
//!
//! Any field can be a sort key, including fields the normalizer passed through
//! untouched. Values that coerce to numbers compare numerically; everything
//! else compares as lowercase text, with missing values as empty text. A
//! numeric field holding no number compares as the text `nan`.

use std::cmp::Ordering;

use serde_json::Value;

use crate::models::{MemberRecord, SortDirection, SortKey, SortState};
use crate::normalize::coerce::parse_number;

const NOT_A_NUMBER: &str = "nan";

/// A field value reduced to what the comparator needs.
///
/// Variant order is the sort order across kinds: empty text sorts before
/// numbers, and numbers before other text. Within a kind values compare
/// naturally.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Empty,
    Number(f64),
    Text(String),
}

impl SortValue {
    fn from_text(text: &str) -> Self {
        if let Some(n) = parse_number(text) {
            return SortValue::Number(n);
        }
        if text.is_empty() {
            SortValue::Empty
        } else {
            SortValue::Text(text.to_lowercase())
        }
    }

    fn from_number(n: Option<f64>) -> Self {
        n.map_or(SortValue::Empty, SortValue::Number)
    }

    /// A coerced or derived field, where `None` is not-a-number.
    fn from_coerced(n: Option<f64>) -> Self {
        n.map_or_else(|| SortValue::Text(NOT_A_NUMBER.to_string()), SortValue::Number)
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortValue::Empty,
            Some(Value::Number(n)) => Self::from_number(n.as_f64().filter(|n| n.is_finite())),
            Some(Value::String(s)) => Self::from_text(s),
            Some(other) => Self::from_text(&other.to_string()),
        }
    }

    fn tier(&self) -> u8 {
        match self {
            SortValue::Empty => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    /// Ascending comparison.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.tier().cmp(&other.tier()),
        }
    }
}

/// Extract the sortable value of `key` from a record.
pub fn field_value(record: &MemberRecord, key: &SortKey) -> SortValue {
    let text = |s: &Option<String>| s.as_deref().map_or(SortValue::Empty, SortValue::from_text);

    match key {
        SortKey::PlayerId => text(&record.player_id),
        SortKey::PlayerName => text(&record.player_name),
        SortKey::LastUpdated => text(&record.last_updated),
        SortKey::TownHall => SortValue::from_coerced(record.town_hall),
        SortKey::CumAttacksUsed => SortValue::from_coerced(record.cum_attacks_used),
        SortKey::CumAttacksPossible => SortValue::from_coerced(record.cum_attacks_possible),
        SortKey::CumDestructionPct => SortValue::from_coerced(record.cum_destruction_pct),
        SortKey::AttacksLeft => SortValue::from_coerced(record.attacks_left),
        SortKey::AvgDestruction => SortValue::from_coerced(record.avg_destruction),
        SortKey::CompletionPct => SortValue::from_coerced(record.completion_pct),
        SortKey::RecommendationScore => SortValue::from_coerced(record.recommendation_score),
        SortKey::RecommendationRank => {
            SortValue::from_number(record.recommendation_rank.map(f64::from))
        }
        SortKey::Other(name) => SortValue::from_json(record.extra.get(name)),
    }
}

/// Return a copy of `records` ordered by `key`. The sort is stable in both
/// directions.
pub fn sort_records(
    records: &[MemberRecord],
    key: &SortKey,
    direction: SortDirection,
) -> Vec<MemberRecord> {
    let mut keyed: Vec<(SortValue, &MemberRecord)> = records
        .iter()
        .map(|record| (field_value(record, key), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

/// Sort by the given state.
pub fn apply_sort(records: &[MemberRecord], state: &SortState) -> Vec<MemberRecord> {
    sort_records(records, &state.key, state.direction)
}
