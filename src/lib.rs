//! # War Recommender
//!
//! Clan war attack recommendations built from per-member war statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (member records, clan tags, sort state)
//! - **normalize**: Response envelope unwrapping and field coercion
//! - **calculate**: Derived per-member metrics and clan summary
//! - **rank**: Recommendation score and rank assignment
//! - **sort**: Column sorting for display
//! - **fetch**: War statistics API client
//! - **query**: Orchestration of fetch, update and shareable links
//! - **render**: Table and JSON presentation
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod query;
pub mod rank;
pub mod render;
pub mod sort;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly timeout string (e.g., "500ms", "30s", "2m").
///
/// Zero is rejected since every request would time out.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let duration = if let Some(n) = s.strip_suffix("ms") {
        Duration::from_millis(n.trim().parse().ok()?)
    } else if let Some(n) = s.strip_suffix('m') {
        Duration::from_secs(n.trim().parse::<u64>().ok()?.checked_mul(60)?)
    } else if let Some(n) = s.strip_suffix('s') {
        Duration::from_secs(n.trim().parse().ok()?)
    } else {
        // Default to seconds
        Duration::from_secs(s.parse().ok()?)
    };

    (!duration.is_zero()).then_some(duration)
}
