//! Inclusive whole-day date intervals.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BlackoutError, Result};

/// An inclusive range of calendar days, `start_date <= end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInterval {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateInterval {
    /// Build an interval, rejecting a start day that falls after the end day.
    ///
    /// # Errors
    /// Returns `BlackoutError::InvalidInterval` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BlackoutError::InvalidInterval { start, end });
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// Build an interval from two days clicked in either order.
    pub fn from_unordered(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start_date: a.min(b),
            end_date: a.max(b),
        }
    }

    /// A one-day interval.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start_date: day,
            end_date: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of days covered, both endpoints included.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// True when `day` is strictly between the endpoints.
    pub fn strictly_contains(&self, day: NaiveDate) -> bool {
        self.start_date < day && day < self.end_date
    }

    pub fn is_boundary(&self, day: NaiveDate) -> bool {
        day == self.start_date || day == self.end_date
    }

    /// Every day of the interval in ascending order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let len = usize::try_from(self.days()).unwrap_or(0);
        self.start_date.iter_days().take(len)
    }

    /// Short label used by the unavailability list, e.g. `Jan 1 - Jan 3, 2024`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}, {}",
            self.start_date.format("%b %-d"),
            self.end_date.format("%b %-d"),
            self.start_date.format("%Y")
        )
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_date, self.end_date)
    }
}

/// Parse an ISO `YYYY-MM-DD` day.
///
/// # Errors
/// Returns `BlackoutError::InvalidDate` when the string is not a valid day.
pub fn parse_iso_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| BlackoutError::InvalidDate(format!("'{}': {}", s, e)))
}
