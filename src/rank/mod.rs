//! Recommendation ranking.
//!
//! The score weights each factor so it dominates everything below it:
//! completion (0..100) × 1e6, then average destruction (0..100) × 1e3, then
//! town hall level. Unknown factors count as zero.

use std::cmp::Ordering;

use crate::models::MemberRecord;
use crate::normalize::finite;

const COMPLETION_WEIGHT: f64 = 1_000_000.0;
const DESTRUCTION_WEIGHT: f64 = 1_000.0;

/// Composite recommendation score for one record.
pub fn recommendation_score(record: &MemberRecord) -> f64 {
    let completion = record.completion_pct.unwrap_or(0.0);
    let avg = record.avg_destruction.unwrap_or(0.0);
    let town_hall = record.town_hall.unwrap_or(0.0);

    completion * COMPLETION_WEIGHT + avg * DESTRUCTION_WEIGHT + town_hall
}

/// Score and rank every record.
///
/// Records come back in their input order, each carrying its score and a
/// 1-based rank. Equal scores take consecutive ranks in input order. A score
/// that overflows is stored as `None` but still ranks by its raw value.
pub fn rank(mut records: Vec<MemberRecord>) -> Vec<MemberRecord> {
    for record in records.iter_mut() {
        record.recommendation_score = finite(recommendation_score(record));
    }

    for (position, index) in ranked_order(&records).into_iter().enumerate() {
        records[index].recommendation_rank = Some(position as u32 + 1);
    }

    records
}

/// Indices of `records` ordered best score first. Stable for ties.
///
/// Scores are recomputed so an overflowing score ranks above every finite one.
pub fn ranked_order(records: &[MemberRecord]) -> Vec<usize> {
    let scores: Vec<f64> = records.iter().map(recommendation_score).collect();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}
