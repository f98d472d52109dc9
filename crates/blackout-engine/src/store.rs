//! Committed unavailability intervals for one editing session.
//!
//! The store keeps intervals in commit order, which is the order the UI numbers
//! them in. It never re-validates on [`IntervalStore::add`]: callers run the
//! overlap check first (see [`crate::selection`]).

use crate::error::{BlackoutError, Result};
use crate::interval::DateInterval;
use crate::overlap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalStore {
    intervals: Vec<DateInterval>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from untrusted intervals (e.g. a rehydrated snapshot).
    ///
    /// # Errors
    /// Returns `BlackoutError::MalformedCacheData` if any two intervals overlap.
    pub fn try_from_intervals(intervals: Vec<DateInterval>) -> Result<Self> {
        if !overlap::is_disjoint(&intervals) {
            return Err(BlackoutError::MalformedCacheData(
                "snapshot contains overlapping intervals".to_string(),
            ));
        }
        Ok(Self { intervals })
    }

    /// Append an interval the caller has already checked for overlap.
    pub fn add(&mut self, interval: DateInterval) -> &[DateInterval] {
        self.intervals.push(interval);
        &self.intervals
    }

    /// Remove the interval at `index`, returning it.
    ///
    /// # Errors
    /// Returns `BlackoutError::IndexOutOfRange` unless `index < len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<DateInterval> {
        if index >= self.intervals.len() {
            return Err(BlackoutError::IndexOutOfRange {
                index,
                len: self.intervals.len(),
            });
        }
        Ok(self.intervals.remove(index))
    }

    /// Total unavailable days across all intervals, endpoints included.
    pub fn total_days(&self) -> i64 {
        self.intervals.iter().map(DateInterval::days).sum()
    }

    /// Keep only the intervals for which `keep` returns true, preserving
    /// commit order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&DateInterval) -> bool,
    {
        self.intervals.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DateInterval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DateInterval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[DateInterval] {
        &self.intervals
    }
}

impl<'a> IntoIterator for &'a IntervalStore {
    type Item = &'a DateInterval;
    type IntoIter = std::slice::Iter<'a, DateInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
