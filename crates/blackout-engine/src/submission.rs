//! Turn committed intervals into the payloads the persistence service expects.
//!
//! The save request carries the intervals themselves, each endpoint pinned to
//! noon UTC so that a viewer's UTC offset can never shift it onto a
//! neighbouring day. The service stores the per-day expansion produced by
//! [`expand`], one `"dd Month yyyy"` string per day.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BlackoutError, Result};
use crate::interval::DateInterval;

/// Format of a stored day, e.g. `01 February 2024`.
pub const DAY_FORMAT: &str = "%d %B %Y";

const NOON: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(time) => time,
    None => panic!("12:00:00 is a valid time"),
};

fn at_noon(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NOON)
}

/// Format a single day the way the persistence service stores it.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a stored day string such as `01 February 2024`.
///
/// # Errors
/// Returns `BlackoutError::InvalidDate` when the string does not match [`DAY_FORMAT`].
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
        .map_err(|e| BlackoutError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Expand one interval into its formatted days, both endpoints included.
pub fn expand_interval(interval: &DateInterval) -> impl Iterator<Item = String> {
    let last = at_noon(interval.end());
    std::iter::successors(Some(at_noon(interval.start())), |at| {
        at.checked_add_days(Days::new(1))
    })
    .take_while(move |at| *at <= last)
    .map(|at| at.format(DAY_FORMAT).to_string())
}

/// Expand every interval into formatted days and flatten them in order.
///
/// Intervals keep their commit order; days within an interval ascend.
pub fn expand(intervals: &[DateInterval]) -> Vec<String> {
    intervals.iter().flat_map(expand_interval).collect()
}

/// One interval on the wire, each endpoint at noon UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPayload {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&DateInterval> for IntervalPayload {
    fn from(interval: &DateInterval) -> Self {
        Self {
            start_date: at_noon(interval.start()).and_utc(),
            end_date: at_noon(interval.end()).and_utc(),
        }
    }
}

impl IntervalPayload {
    /// Recover the whole-day interval from its wire form.
    ///
    /// # Errors
    /// Returns `BlackoutError::InvalidInterval` if the end precedes the start.
    pub fn to_interval(&self) -> Result<DateInterval> {
        DateInterval::new(self.start_date.date_naive(), self.end_date.date_naive())
    }
}

/// Body of the save call: `{ "unavailableDates": [{ "startDate", "endDate" }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub unavailable_dates: Vec<IntervalPayload>,
}

impl SaveRequest {
    pub fn from_intervals(intervals: &[DateInterval]) -> Self {
        Self {
            unavailable_dates: intervals.iter().map(IntervalPayload::from).collect(),
        }
    }

    /// The per-day list the service will store for this request.
    ///
    /// # Errors
    /// Returns `BlackoutError::InvalidInterval` if any payload is reversed.
    pub fn expanded_dates(&self) -> Result<Vec<String>> {
        let intervals = self
            .unavailable_dates
            .iter()
            .map(IntervalPayload::to_interval)
            .collect::<Result<Vec<_>>>()?;
        Ok(expand(&intervals))
    }
}

/// One stored submission as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAvailability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredAvailability {
    /// Parse the stored day strings back into calendar days.
    ///
    /// # Errors
    /// Returns `BlackoutError::InvalidDate` on the first unparsable entry.
    pub fn days(&self) -> Result<Vec<NaiveDate>> {
        self.dates.iter().map(|s| parse_day(s)).collect()
    }
}

/// Acknowledgement returned by a successful save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<StoredAvailability>,
}

/// Response of the read side: `{ "availabilities": [...] }`, newest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AvailabilityList {
    #[serde(default)]
    pub availabilities: Vec<StoredAvailability>,
}

/// An immutable snapshot of the committed intervals taken when a submission
/// starts.
///
/// Later edits to the session never reach an in-flight ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    intervals: Vec<DateInterval>,
}

impl SubmissionTicket {
    pub fn new(intervals: &[DateInterval]) -> Self {
        Self {
            intervals: intervals.to_vec(),
        }
    }

    pub fn intervals(&self) -> &[DateInterval] {
        &self.intervals
    }

    pub fn request(&self) -> SaveRequest {
        SaveRequest::from_intervals(&self.intervals)
    }

    pub fn expanded_dates(&self) -> Vec<String> {
        expand(&self.intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn payload_pins_endpoints_to_noon_utc() {
        let interval = DateInterval::new(day(2024, 1, 30), day(2024, 2, 1)).unwrap();
        let json = serde_json::to_string(&SaveRequest::from_intervals(&[interval])).unwrap();
        assert_eq!(
            json,
            r#"{"unavailableDates":[{"startDate":"2024-01-30T12:00:00Z","endDate":"2024-02-01T12:00:00Z"}]}"#
        );
    }

    #[test]
    fn parse_day_reads_stored_format() {
        assert_eq!(parse_day("01 February 2024").unwrap(), day(2024, 2, 1));
        assert!(parse_day("2024-02-01").is_err());
    }
}
