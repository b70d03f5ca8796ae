//! Derived metrics.
//!
//! Computes per-member metrics from the coerced counters:
//! - Attacks left
//! - Average destruction per attack
//! - Completion percentage
//!
//! and the clan-wide summary shown above the results table.

use serde::{Deserialize, Serialize};

use crate::models::MemberRecord;
use crate::normalize::finite;

/// Attacks still available: max(0, possible - used).
pub fn attacks_left(used: Option<f64>, possible: Option<f64>) -> Option<f64> {
    let (used, possible) = (used?, possible?);
    finite((possible - used).max(0.0))
}

/// Destruction per attack. `None` when no attacks were used.
pub fn avg_destruction(destruction_pct: Option<f64>, used: Option<f64>) -> Option<f64> {
    let (destruction_pct, used) = (destruction_pct?, used?);
    if used > 0.0 {
        finite(destruction_pct / used)
    } else {
        None
    }
}

/// Share of available attacks that were used, as a percentage.
pub fn completion_pct(used: Option<f64>, possible: Option<f64>) -> Option<f64> {
    let (used, possible) = (used?, possible?);
    if possible > 0.0 {
        finite(used / possible * 100.0)
    } else {
        None
    }
}

/// Fill in `avg_destruction` and `completion_pct` on every record.
pub fn apply_derived_metrics(records: &mut [MemberRecord]) {
    for record in records.iter_mut() {
        record.avg_destruction =
            avg_destruction(record.cum_destruction_pct, record.cum_attacks_used);
        record.completion_pct =
            completion_pct(record.cum_attacks_used, record.cum_attacks_possible);
    }
}

/// Clan-wide totals for the summary line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanSummary {
    pub members: usize,
    pub total_attacks_used: f64,
    pub total_attacks_possible: f64,
    /// Total destruction / total attacks used, rounded
    pub avg_destruction: f64,
}

/// Summarize a result set. Unknown counters count as zero.
pub fn summarize(records: &[MemberRecord]) -> ClanSummary {
    let total_attacks_used: f64 = records.iter().filter_map(|r| r.cum_attacks_used).sum();
    let total_attacks_possible: f64 = records.iter().filter_map(|r| r.cum_attacks_possible).sum();
    let total_destruction: f64 = records.iter().filter_map(|r| r.cum_destruction_pct).sum();

    let avg_destruction = if total_attacks_used > 0.0 {
        (total_destruction / total_attacks_used).round()
    } else {
        0.0
    };

    ClanSummary {
        members: records.len(),
        total_attacks_used,
        total_attacks_possible,
        avg_destruction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(used: Option<f64>, possible: Option<f64>, destruction: Option<f64>) -> MemberRecord {
        MemberRecord {
            cum_attacks_used: used,
            cum_attacks_possible: possible,
            cum_destruction_pct: destruction,
            ..Default::default()
        }
    }

    #[test]
    fn test_attacks_left() {
        assert_eq!(attacks_left(Some(1.0), Some(2.0)), Some(1.0));
        assert_eq!(attacks_left(Some(2.0), Some(2.0)), Some(0.0));
        assert_eq!(attacks_left(None, Some(2.0)), None);
        assert_eq!(attacks_left(Some(1.0), None), None);
    }

    #[test]
    fn test_attacks_left_never_negative() {
        for used in 0..10 {
            for possible in 0..10 {
                let left = attacks_left(Some(used as f64), Some(possible as f64)).unwrap();
                assert!(left >= 0.0);
                assert_eq!(left, (possible - used).max(0) as f64);
            }
        }
    }

    #[test]
    fn test_avg_destruction() {
        assert_eq!(avg_destruction(Some(50.0), Some(1.0)), Some(50.0));
        assert_eq!(avg_destruction(Some(250.0), Some(4.0)), Some(62.5));
        assert_eq!(avg_destruction(Some(50.0), Some(0.0)), None);
        assert_eq!(avg_destruction(None, Some(3.0)), None);
        assert_eq!(avg_destruction(Some(50.0), None), None);
    }

    #[test]
    fn test_completion_pct() {
        assert_eq!(completion_pct(Some(1.0), Some(2.0)), Some(50.0));
        assert_eq!(completion_pct(Some(6.0), Some(6.0)), Some(100.0));
        assert_eq!(completion_pct(Some(1.0), Some(0.0)), None);
        assert_eq!(completion_pct(Some(1.0), Some(-2.0)), None);
        assert_eq!(completion_pct(None, Some(2.0)), None);
    }

    #[test]
    fn test_division_never_overflows_to_infinity() {
        assert_eq!(avg_destruction(Some(f64::MAX), Some(1e-300)), None);
        assert_eq!(completion_pct(Some(f64::MAX), Some(1e-300)), None);
    }

    #[test]
    fn test_apply_derived_metrics() {
        let mut records = vec![
            record(Some(1.0), Some(2.0), Some(50.0)),
            record(Some(0.0), Some(0.0), Some(0.0)),
        ];

        apply_derived_metrics(&mut records);

        assert_eq!(records[0].avg_destruction, Some(50.0));
        assert_eq!(records[0].completion_pct, Some(50.0));
        assert_eq!(records[1].avg_destruction, None);
        assert_eq!(records[1].completion_pct, None);
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record(Some(2.0), Some(4.0), Some(150.0)),
            record(Some(1.0), Some(2.0), Some(100.0)),
            record(None, None, None),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.members, 3);
        assert_eq!(summary.total_attacks_used, 3.0);
        assert_eq!(summary.total_attacks_possible, 6.0);
        // 250 / 3 = 83.33
        assert_eq!(summary.avg_destruction, 83.0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary, ClanSummary::default());
    }
}
