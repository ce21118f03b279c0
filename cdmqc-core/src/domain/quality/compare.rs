// cdmqc-core/src/domain/quality/compare.rs
//
// Snapshot comparator: diffs one (table, metric) pair between the previous
// and current refresh. A zero baseline makes relative change undefined
// rather than infinite, so percent_change is None there — deliberate policy,
// distinct from the share-of-total zero-guard in metrics.rs.

use super::metrics::round_to;

/// Percent change from `previous` to `current`, 1 decimal. None when the
/// baseline is 0, regardless of `current`.
pub fn percent_change(previous: i64, current: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some(round_to(
        ((current - previous) as f64 / previous as f64) * 100.0,
        1,
    ))
}

/// Diff of one metric between two snapshots of the same table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotComparison {
    pub previous: i64,
    pub current: i64,
    pub change: Option<f64>,
}

impl SnapshotComparison {
    pub fn new(previous: i64, current: i64) -> Self {
        Self {
            previous,
            current,
            change: percent_change(previous, current),
        }
    }
}
