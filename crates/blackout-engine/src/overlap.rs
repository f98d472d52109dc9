//! Detect conflicts between a candidate interval and committed intervals.
//!
//! The policy is conservative: sharing a boundary day counts as an overlap, so
//! back-to-back ranges such as `Jan 1..=Jan 5` and `Jan 5..=Jan 8` conflict.
//! A one-day gap (`Jan 6..=Jan 8`) does not.

use crate::interval::DateInterval;

/// Whether two inclusive intervals share any day.
///
/// `a` and `b` overlap when any of the following holds:
/// - they start on the same day, or end on the same day;
/// - they cross properly: `a.start < b.end && a.end > b.start`;
/// - one starts on the day the other ends.
pub fn overlaps(a: &DateInterval, b: &DateInterval) -> bool {
    a.start() == b.start()
        || a.end() == b.end()
        || (a.start() < b.end() && a.end() > b.start())
        || a.start() == b.end()
        || a.end() == b.start()
}

/// Whether `candidate` overlaps any interval in `existing`.
///
/// Stops at the first conflict.
pub fn overlaps_any(candidate: &DateInterval, existing: &[DateInterval]) -> bool {
    find_overlap(candidate, existing).is_some()
}

/// Index of the first interval in `existing` that conflicts with `candidate`.
pub fn find_overlap(candidate: &DateInterval, existing: &[DateInterval]) -> Option<usize> {
    existing.iter().position(|interval| overlaps(candidate, interval))
}

/// Whether no two intervals in `intervals` overlap.
pub fn is_disjoint(intervals: &[DateInterval]) -> bool {
    intervals
        .iter()
        .enumerate()
        .all(|(i, a)| !overlaps_any(a, &intervals[i + 1..]))
}
