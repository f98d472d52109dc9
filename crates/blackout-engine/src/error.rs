//! Error types for blackout-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::interval::DateInterval;

#[derive(Error, Debug)]
pub enum BlackoutError {
    /// The candidate shares at least one day with a committed interval.
    #[error("Product is unavailable for these dates: {candidate} overlaps a committed range")]
    OverlapRejected { candidate: DateInterval },

    #[error("Index {index} out of range for {len} committed interval(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Failed to fetch saved availability: {0}")]
    FetchFailed(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No unavailable dates to submit")]
    NothingToSubmit,

    #[error("Malformed cache data: {0}")]
    MalformedCacheData(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BlackoutError>;
