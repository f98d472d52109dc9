//! # blackout-engine
//!
//! Pick the date ranges during which a product is unavailable.
//!
//! A user clicks a start day and an end day on a calendar. The engine
//! normalizes the pair into an inclusive range, rejects it if it shares any day
//! with a range already committed, and otherwise stages it until the user
//! confirms. Committed ranges are cached locally across reloads and finally
//! submitted to the availability service.
//!
//! ## Quick start
//!
//! ```rust
//! use blackout_engine::{AvailabilitySession, SelectionEvent, SessionConfig};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let mut session = AvailabilitySession::new(&SessionConfig::default());
//!
//! session.date_clicked(day(5)).unwrap();
//! let event = session.date_clicked(day(1)).unwrap();
//! assert!(matches!(event, SelectionEvent::Pending(_)));
//!
//! session.confirm_pending();
//! assert_eq!(session.total_days(), 5);
//!
//! // Sharing the boundary day with a committed range is a conflict.
//! session.date_clicked(day(5)).unwrap();
//! assert!(session.date_clicked(day(8)).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — `DateInterval`, an inclusive whole-day range
//! - [`overlap`] — Conservative overlap predicate
//! - [`store`] — Committed, non-overlapping intervals
//! - [`selection`] — The two-click picking state machine
//! - [`submission`] — Day expansion and persistence payloads
//! - [`backend`] — Persistence service seam and HTTP client
//! - [`cache`] — Local session cache and snapshot validation
//! - [`session`] — The controller wiring all of the above
//! - [`config`] — Session configuration
//! - [`error`] — Error types

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod interval;
pub mod overlap;
pub mod selection;
pub mod session;
pub mod store;
pub mod submission;

pub use backend::AvailabilityBackend;
#[cfg(feature = "http")]
pub use backend::HttpBackend;
pub use cache::{FileCache, MemoryCache, SessionCache};
pub use config::SessionConfig;
pub use error::BlackoutError;
pub use interval::DateInterval;
pub use overlap::{overlaps, overlaps_any};
pub use selection::{SelectionEvent, SelectionMachine, SelectionState};
pub use session::{AvailabilitySession, DayMark};
pub use store::IntervalStore;
pub use submission::{expand, SaveRequest, SubmissionTicket};
